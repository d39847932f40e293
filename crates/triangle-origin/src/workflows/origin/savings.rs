use super::config::EngineConfig;
use super::domain::{
    Money, QualificationResult, SavingsReport, SupplementalTariffExposure, TariffRateRecord,
};

/// Derives duty savings and surtax exposure from a qualification outcome.
///
/// `calculate` never fails: a missing or malformed input produces a zero-valued report so
/// callers always receive a report for a valid call.
pub struct SavingsCalculator<'a> {
    config: &'a EngineConfig,
}

impl<'a> SavingsCalculator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn calculate(
        &self,
        qualification: &QualificationResult,
        rates: &TariffRateRecord,
        trade_volume: Money,
    ) -> SavingsReport {
        let exposure = self.exposure(rates);

        let inputs_usable = trade_volume.is_finite()
            && trade_volume >= 0.0
            && rates.mfn_rate.is_finite()
            && rates.preferential_rate.is_finite();

        if !qualification.qualified || !inputs_usable {
            return SavingsReport::zero(exposure);
        }

        let spread = rates.rate_spread();
        let annual_savings = round_cents(trade_volume * spread / 100.0);

        SavingsReport {
            annual_savings,
            monthly_savings: round_cents(annual_savings / 12.0),
            savings_percentage: spread,
            section_301_exposure: exposure,
        }
    }

    fn exposure(&self, rates: &TariffRateRecord) -> SupplementalTariffExposure {
        match self.config.watch_list_entry(&rates.source_country) {
            Some(entry) => SupplementalTariffExposure {
                is_exposed: true,
                estimated_rate: entry.estimated_rate,
            },
            None => SupplementalTariffExposure::none(),
        }
    }
}

fn round_cents(value: Money) -> Money {
    (value * 100.0).round() / 100.0
}
