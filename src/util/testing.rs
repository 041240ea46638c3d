//! Test support: one tracing subscriber per test binary, plus a seeded network.

use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::services::NetworkService;
use crate::domain::{UnitDraft, UnitId, UnitNode};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    // RUST_LOG wins; otherwise this crate at debug and dependencies at warn
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,partynet=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// One unit per level, chained union → village → ward → booth.
#[derive(Debug, Clone)]
pub struct Chain {
    pub union: UnitNode,
    pub village: UnitNode,
    pub ward: UnitNode,
    pub booth: UnitNode,
}

impl Chain {
    pub fn ids(&self) -> [UnitId; 4] {
        [
            UnitId::new(&self.union.id),
            UnitId::new(&self.village.id),
            UnitId::new(&self.ward.id),
            UnitId::new(&self.booth.id),
        ]
    }
}

/// Create a four-level chain named after `prefix` (e.g. "Alpha", "Alpha-V", ...).
///
/// Panics if the service rejects any of the units.
pub fn seed_chain(service: &NetworkService, prefix: &str) -> Chain {
    let union = service
        .create_unit(UnitDraft::new("union", prefix))
        .expect("create union");
    let village = service
        .create_unit(UnitDraft::new("village", format!("{prefix}-V")).with_parent(&union.id))
        .expect("create village");
    let ward = service
        .create_unit(UnitDraft::new("ward", format!("{prefix}-W")).with_parent(&village.id))
        .expect("create ward");
    let booth = service
        .create_unit(UnitDraft::new("booth", format!("{prefix}-B")).with_parent(&ward.id))
        .expect("create booth");
    Chain {
        union,
        village,
        ward,
        booth,
    }
}
