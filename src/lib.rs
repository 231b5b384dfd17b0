// SPDX-License-Identifier: MIT

//! Poop Map API: location-based social backend.
//!
//! Geotagged entries with per-entry privacy, a friend graph, likes and
//! comments, activity feeds, leaderboards, and gameplay extras, served over
//! a uniform persistence adapter with interchangeable backends.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use config::Config;
use services::{
    EntryService, FeedService, GameplayService, IdentityService, InteractionService,
    SocialGraphService,
};
use store::Store;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub entries: EntryService,
    pub social: SocialGraphService,
    pub interactions: InteractionService,
    pub identity: IdentityService,
    pub feed: FeedService,
    pub gameplay: GameplayService,
}

impl AppState {
    pub fn new(config: Config, store: Store) -> Self {
        Self {
            config,
            entries: EntryService::new(store.clone()),
            social: SocialGraphService::new(store.clone()),
            interactions: InteractionService::new(store.clone()),
            identity: IdentityService::new(store.clone()),
            feed: FeedService::new(store.clone()),
            gameplay: GameplayService::new(store.clone()),
            store,
        }
    }
}
