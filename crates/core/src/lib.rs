pub mod catalog;
pub mod config;
pub mod metrics;
pub mod normalize;
pub mod orchestrator;
pub mod source;
pub mod testing;

pub use catalog::{
    AttrValue, CatalogIndex, Item, ItemKey, SelectionState, UpsertStats, ALL_CATEGORIES,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig, SourceConfig, SourcesConfig,
};
pub use orchestrator::{FetchOrchestrator, PassOutcome, RefreshError, RefreshPhase};
pub use source::{
    ApexSource, Cs2Source, DotaSource, FortniteSource, PubgSource, RawBatch, RivalsSource,
    SourceAdapter, SourceError, SourceUnavailable, ValorantSource,
};
