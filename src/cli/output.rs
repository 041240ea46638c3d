//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use termtree::Tree;

use crate::domain::{Forest, Photo, UnionTree, UnitNode, VillageTree, WardTree};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print diff removal (red -)
pub fn diff_remove(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {} {}", "-".red(), msg);
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// One-line label used in tree and list views.
pub fn node_label(node: &UnitNode) -> String {
    format!("{} {}", node, node.id.dimmed())
}

/// Print every field of a unit.
pub fn unit_details(node: &UnitNode) {
    header(&node.name_label);
    detail(&format!("id:      {}", node.id));
    detail(&format!("level:   {}", node.level));
    detail(&format!(
        "parent:  {}",
        node.parent_id.as_deref().unwrap_or("-")
    ));
    detail(&format!("person:  {}", node.person_name));
    detail(&format!("role:    {}", node.role_label));
    detail(&format!("phone:   {}", node.phone));
    let photo = match Photo::classify(&node.photo) {
        Photo::None => "-".to_string(),
        Photo::DataUri { mime } => format!("inline {} ({} chars)", mime, node.photo.len()),
        Photo::Url(url) => url.to_string(),
    };
    detail(&format!("photo:   {}", photo));
}

/// Conversion into a printable termtree.
pub trait ToTermTree {
    fn to_term_tree(&self) -> Tree<String>;
}

impl ToTermTree for WardTree {
    fn to_term_tree(&self) -> Tree<String> {
        Tree::new(node_label(&self.unit))
            .with_leaves(self.booths.iter().map(|b| Tree::new(node_label(b))))
    }
}

impl ToTermTree for VillageTree {
    fn to_term_tree(&self) -> Tree<String> {
        Tree::new(node_label(&self.unit))
            .with_leaves(self.wards.iter().map(ToTermTree::to_term_tree))
    }
}

impl ToTermTree for UnionTree {
    fn to_term_tree(&self) -> Tree<String> {
        Tree::new(node_label(&self.unit))
            .with_leaves(self.villages.iter().map(ToTermTree::to_term_tree))
    }
}

/// Print each union tree, or a note when the network is empty.
pub fn forest(forest: &Forest) {
    if forest.is_empty() {
        warning("no units yet");
        return;
    }
    for union in forest.unions() {
        print!("{}", union.to_term_tree());
    }
}
