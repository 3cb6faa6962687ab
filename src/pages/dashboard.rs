//! Dashboard statistics screen.

use wire::DashboardStatistics;

use crate::net::ClientError;
use crate::state::slice::DateRange;
use crate::state::statistics::StatisticsSlice;

pub struct DashboardPage {
    statistics: StatisticsSlice,
    range: DateRange,
}

impl DashboardPage {
    #[must_use]
    pub fn new(statistics: StatisticsSlice) -> Self {
        Self { statistics, range: DateRange::default() }
    }

    #[must_use]
    pub fn statistics(&self) -> &StatisticsSlice {
        &self.statistics
    }

    /// # Errors
    ///
    /// The fetch failure, also recorded in the fetch slot.
    pub async fn mount(&self) -> Result<Option<DashboardStatistics>, ClientError> {
        self.statistics.fetch(&self.range).await
    }

    /// # Errors
    ///
    /// The fetch failure, also recorded in the fetch slot.
    pub async fn apply_dates(&mut self, range: DateRange) -> Result<Option<DashboardStatistics>, ClientError> {
        self.range = range;
        self.statistics.fetch(&self.range).await
    }

    pub fn unmount(&self) {
        self.statistics.clear_error();
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
