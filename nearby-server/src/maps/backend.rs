//! Runtime choice between the live web services and a fixture file.

use crate::domain::{CandidateRecord, Coordinate};
use crate::pipeline::{DistanceMatrix, MatrixElement, NearbyRequest, PlaceSearch, ProviderError};

use super::client::MapsClient;
use super::fixture::FixtureProvider;

/// Either provider, so the server binary has one concrete pipeline type.
#[derive(Debug, Clone)]
pub enum MapsBackend {
    Live(MapsClient),
    Fixture(FixtureProvider),
}

impl MapsBackend {
    pub fn name(&self) -> &'static str {
        match self {
            MapsBackend::Live(_) => "live",
            MapsBackend::Fixture(_) => "fixture",
        }
    }
}

impl From<MapsClient> for MapsBackend {
    fn from(client: MapsClient) -> Self {
        MapsBackend::Live(client)
    }
}

impl From<FixtureProvider> for MapsBackend {
    fn from(fixture: FixtureProvider) -> Self {
        MapsBackend::Fixture(fixture)
    }
}

impl PlaceSearch for MapsBackend {
    async fn nearby(&self, request: &NearbyRequest) -> Result<Vec<CandidateRecord>, ProviderError> {
        match self {
            MapsBackend::Live(client) => client.nearby(request).await,
            MapsBackend::Fixture(fixture) => fixture.nearby(request).await,
        }
    }
}

impl DistanceMatrix for MapsBackend {
    async fn driving_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>, ProviderError> {
        match self {
            MapsBackend::Live(client) => client.driving_times(origin, destinations).await,
            MapsBackend::Fixture(fixture) => fixture.driving_times(origin, destinations).await,
        }
    }
}
