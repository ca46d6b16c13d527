//! Caller-side state for a weather display.
//!
//! A [`WeatherSession`] tracks the most recently issued query so that a
//! slower, superseded query can never overwrite a newer result.

use parking_lot::Mutex;
use tracing::debug;

use crate::{error::QueryError, model::WeatherViewModel, service::WeatherQueryService};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Loading {
        city: String,
    },
    Success(WeatherViewModel),
    Failed(QueryError),
}

impl QueryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading { .. })
    }
}

/// Handle for one issued query. Only the latest ticket may publish a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    generation: u64,
    city: String,
}

impl QueryTicket {
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug, Default)]
struct Inner {
    generation: u64,
    state: QueryState,
    last_success: Option<WeatherViewModel>,
    last_city: Option<String>,
}

#[derive(Debug, Default)]
pub struct WeatherSession {
    inner: Mutex<Inner>,
}

impl WeatherSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a new query as in flight, superseding any outstanding one.
    pub fn begin(&self, city: &str) -> QueryTicket {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state = QueryState::Loading { city: city.to_string() };

        QueryTicket {
            generation: inner.generation,
            city: city.to_string(),
        }
    }

    /// Publish a result. Returns `false` and discards it if a newer query was
    /// issued after `ticket`.
    ///
    /// A failure leaves the last successful view model in place.
    pub fn complete(
        &self,
        ticket: &QueryTicket,
        result: Result<WeatherViewModel, QueryError>,
    ) -> bool {
        let mut inner = self.inner.lock();
        if ticket.generation != inner.generation {
            debug!(
                city = %ticket.city,
                ticket = ticket.generation,
                latest = inner.generation,
                "discarding superseded weather result"
            );
            return false;
        }

        inner.state = match result {
            Ok(view_model) => {
                inner.last_success = Some(view_model.clone());
                inner.last_city = Some(ticket.city.trim().to_string());
                QueryState::Success(view_model)
            }
            Err(err) => QueryState::Failed(err),
        };
        true
    }

    /// Issue `city` through `service` and publish the outcome.
    ///
    /// Returns whether the result was applied; read [`state`](Self::state)
    /// for the outcome itself.
    pub async fn run(&self, service: &WeatherQueryService, city: &str) -> bool {
        let ticket = self.begin(city);
        let result = service.query(city).await;
        self.complete(&ticket, result)
    }

    /// Re-run the last successfully displayed city. `None` if there is none.
    pub async fn refresh(&self, service: &WeatherQueryService) -> Option<bool> {
        let city = self.last_city()?;
        Some(self.run(service, &city).await)
    }

    pub fn state(&self) -> QueryState {
        self.inner.lock().state.clone()
    }

    /// The view model currently on display, surviving later failures.
    pub fn view_model(&self) -> Option<WeatherViewModel> {
        self.inner.lock().last_success.clone()
    }

    pub fn last_city(&self) -> Option<String> {
        self.inner.lock().last_city.clone()
    }
}
