//! Scripted providers for pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{CandidateRecord, Coordinate, CoordinateKey, TravelTime};

use super::context::Generations;
use super::provider::{
    DistanceMatrix, ElementStatus, MatrixElement, NearbyRequest, PlaceSearch, ProviderError,
};

/// Origin used throughout the tests.
pub(crate) fn origin() -> Coordinate {
    Coordinate::new(22.2898675, 113.9412633).unwrap()
}

/// A candidate placed `n` thousandths of a degree north of the origin.
pub(crate) fn place(id: &str, name: &str, n: u32) -> CandidateRecord {
    let location = Coordinate::new(22.2898675 + f64::from(n) * 0.001, 113.9412633).unwrap();
    CandidateRecord::new(id, name, location)
}

/// Place search answering by keyword.
#[derive(Default)]
pub(crate) struct ScriptedPlaces {
    responses: HashMap<String, Result<Vec<CandidateRecord>, ProviderError>>,
    requests: Mutex<Vec<NearbyRequest>>,
    delay: Duration,
    supersede: Option<(usize, Generations)>,
}

impl ScriptedPlaces {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, keyword: &str, records: Vec<CandidateRecord>) -> Self {
        self.responses.insert(keyword.to_string(), Ok(records));
        self
    }

    pub(crate) fn fail(mut self, keyword: &str, status: &str) -> Self {
        self.responses.insert(
            keyword.to_string(),
            Err(ProviderError::Status {
                status: status.to_string(),
                message: "scripted failure".to_string(),
            }),
        );
        self
    }

    /// Sleep this long inside every call.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Start a newer generation while serving the `call`th request.
    pub(crate) fn superseding_at(mut self, call: usize, generations: Generations) -> Self {
        self.supersede = Some((call, generations));
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<NearbyRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl PlaceSearch for ScriptedPlaces {
    async fn nearby(&self, request: &NearbyRequest) -> Result<Vec<CandidateRecord>, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some((at, generations)) = &self.supersede {
            if call == *at {
                generations.begin();
            }
        }

        self.responses
            .get(&request.keyword)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Distance matrix answering by destination.
#[derive(Default)]
pub(crate) struct ScriptedMatrix {
    elements: HashMap<CoordinateKey, MatrixElement>,
    failing_calls: HashSet<usize>,
    short_calls: HashSet<usize>,
    batch_sizes: Mutex<Vec<usize>>,
    delay: Duration,
}

impl ScriptedMatrix {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Driving time for the place's location.
    pub(crate) fn minutes(mut self, record: &CandidateRecord, minutes: u32) -> Self {
        self.elements
            .insert(record.location.key(), Ok(TravelTime::from_minutes(minutes)));
        self
    }

    pub(crate) fn unreachable(mut self, record: &CandidateRecord, status: ElementStatus) -> Self {
        self.elements.insert(record.location.key(), Err(status));
        self
    }

    /// Sleep this long inside every call.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make the `call`th request (1-based) fail outright.
    pub(crate) fn fail_call(mut self, call: usize) -> Self {
        self.failing_calls.insert(call);
        self
    }

    /// Make the `call`th request (1-based) return one element too few.
    pub(crate) fn short_call(mut self, call: usize) -> Self {
        self.short_calls.insert(call);
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.batch_sizes.lock().unwrap().len()
    }

    pub(crate) fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }
}

impl DistanceMatrix for ScriptedMatrix {
    async fn driving_times(
        &self,
        _origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>, ProviderError> {
        let call = {
            let mut sizes = self.batch_sizes.lock().unwrap();
            sizes.push(destinations.len());
            sizes.len()
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.failing_calls.contains(&call) {
            return Err(ProviderError::Unavailable("scripted batch failure".into()));
        }

        let mut elements: Vec<MatrixElement> = destinations
            .iter()
            .map(|d| {
                self.elements
                    .get(&d.key())
                    .cloned()
                    .unwrap_or(Err(ElementStatus::NotFound))
            })
            .collect();

        if self.short_calls.contains(&call) {
            elements.pop();
        }

        Ok(elements)
    }
}
