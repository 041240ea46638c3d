//! Create/update validation rules for units.

use crate::domain::entities::{Level, Unit, UnitDraft, UnitId, UnitPatch, ValidUnit};
use crate::domain::error::DomainError;

/// Validate and normalize a create request.
///
/// Checks run in order: level, parent presence, name. A union's parent is dropped.
pub fn validate_draft(draft: UnitDraft) -> Result<ValidUnit, DomainError> {
    let level = Level::parse(&draft.level)?;

    let parent_id = draft
        .parent_id
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .map(UnitId::from);
    let parent_id = match (level.requires_parent(), parent_id) {
        (false, _) => None,
        (true, None) => return Err(DomainError::MissingParent(level)),
        (true, Some(parent)) => Some(parent),
    };

    let name_label = draft.name_label.trim().to_string();
    if name_label.is_empty() {
        return Err(DomainError::MissingName);
    }

    Ok(ValidUnit {
        level,
        name_label,
        parent_id,
        person_name: trimmed(draft.person_name),
        role_label: trimmed(draft.role_label),
        phone: trimmed(draft.phone),
        photo: draft.photo.unwrap_or_default(),
    })
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Check that `parent` exists and sits directly above `level`.
pub fn check_parent(
    level: Level,
    parent_id: &UnitId,
    parent: Option<&Unit>,
) -> Result<(), DomainError> {
    let Some(expected) = level.parent_level() else {
        return Ok(());
    };
    let invalid = |reason: String| DomainError::InvalidParent {
        level,
        parent: parent_id.clone(),
        reason,
    };
    match parent {
        None => Err(invalid("parent does not exist".to_string())),
        Some(p) if p.level != expected => Err(invalid(format!(
            "parent is a {}, expected a {}",
            p.level, expected
        ))),
        Some(_) => Ok(()),
    }
}

/// Normalize a patch: text fields are trimmed (photo is kept verbatim) and a
/// present name must stay non-empty.
pub fn normalize_patch(patch: UnitPatch) -> Result<UnitPatch, DomainError> {
    let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
    let patch = UnitPatch {
        name_label: trim(patch.name_label),
        person_name: trim(patch.person_name),
        role_label: trim(patch.role_label),
        phone: trim(patch.phone),
        photo: patch.photo,
    };
    if matches!(patch.name_label.as_deref(), Some("")) {
        return Err(DomainError::MissingName);
    }
    Ok(patch)
}
