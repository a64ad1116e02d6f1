//! Test helpers wiring the CLI commands to scripted providers.

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;

use dinemap_core::test_support::{
    FixedLocation, FixedRestaurants, ScriptedDirections, ScriptedPlaces,
};
use dinemap_core::{Coordinate, Providers, Restaurant};

use crate::CliError;
use crate::providers::{ProviderFactory, Services};

/// Factory handing out the same scripted providers for every invocation and
/// remembering the endpoints each command asked for.
pub(super) struct StubProviderFactory {
    providers: Providers,
    requested: RefCell<Vec<Services>>,
}

impl StubProviderFactory {
    pub(super) fn new(providers: Providers) -> Self {
        Self {
            providers,
            requested: RefCell::new(Vec::new()),
        }
    }

    pub(super) fn requested(&self) -> Vec<Services> {
        self.requested.borrow().clone()
    }
}

impl ProviderFactory for StubProviderFactory {
    fn build(&self, services: &Services) -> Result<Providers, CliError> {
        self.requested.borrow_mut().push(services.clone());
        Ok(self.providers.clone())
    }
}

pub(super) fn at(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).expect("valid coordinate")
}

pub(super) fn centre() -> Coordinate {
    at(10.0, 106.0)
}

/// Restaurants `A` and `B` a short way north-east of [`centre`].
pub(super) fn directory() -> Vec<Restaurant> {
    vec![
        Restaurant::new("A", "Com Tam A", at(10.01, 106.01)),
        Restaurant::new("B", "Banh Mi B", at(10.02, 106.02)),
    ]
}

pub(super) fn providers_with(places: Arc<ScriptedPlaces>) -> Providers {
    Providers {
        location: Arc::new(FixedLocation::at(centre()).with_address("1 Le Loi, District 1")),
        map_data: Arc::new(FixedRestaurants::new(directory())),
        directions: Arc::new(ScriptedDirections::new()),
        places,
    }
}

/// Run `future` on a paused current-thread runtime so debounce timers
/// elapse instantly.
pub(super) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .expect("test runtime")
        .block_on(future)
}
