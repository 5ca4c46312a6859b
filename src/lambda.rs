use crate::form::{FormIntensity, FormTable, form_intensity};
use crate::league_params::BaselineTable;
use crate::segments::SegmentIndex;
use crate::tables::{MatchFixture, ModelInputs};

/// Read-only lookup tables, built once per run before any fixture is priced.
#[derive(Debug, Clone, Default)]
pub struct ModelTables {
    pub baselines: BaselineTable,
    pub form: FormTable,
    pub segments: SegmentIndex,
}

impl ModelTables {
    pub fn build(inputs: &ModelInputs) -> Self {
        Self {
            baselines: BaselineTable::from_results(&inputs.results),
            form: FormTable::from_rows(&inputs.recent_form),
            segments: SegmentIndex::from_bins(&inputs.segments),
        }
    }

    pub fn lambdas(&self, fixture: &MatchFixture) -> LambdaBreakdown {
        let form = form_intensity(fixture, &self.baselines, &self.form);
        // Home goals: the home side's scoring profile. Away goals: the away
        // side's conceding profile.
        let segment_home = self
            .segments
            .multiplier(&fixture.league, &fixture.home, true);
        let segment_away = self
            .segments
            .multiplier(&fixture.league, &fixture.away, false);

        LambdaBreakdown {
            lambda_home: form.home * segment_home,
            lambda_away: form.away * segment_away,
            form,
            segment_home,
            segment_away,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaBreakdown {
    pub form: FormIntensity,
    pub segment_home: f64,
    pub segment_away: f64,
    pub lambda_home: f64,
    pub lambda_away: f64,
}
