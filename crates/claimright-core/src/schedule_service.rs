use chrono::Duration;
use rust_decimal::Decimal;

use claimright_domain::{
    checked_sum, divide_with_remainder, minor_units, split_periods, ClaimRight, ScheduleEntry,
};

use crate::CoreError;

/// Builds the fixed amortization schedule of a claim.
pub struct ScheduleGenerator;

impl ScheduleGenerator {
    /// Splits the claim's date range by its frequency and spreads the total
    /// over the periods in whole minor units of its currency. Every entry but the
    /// last receives the floored share; the last absorbs the remainder.
    pub fn generate(claim: &ClaimRight) -> Result<Vec<ScheduleEntry>, CoreError> {
        if claim.total_amount <= Decimal::ZERO {
            return Err(CoreError::InvalidSchedule(format!(
                "total amount must be positive, got {}",
                claim.total_amount
            )));
        }
        let periods = split_periods(claim.start_date, claim.end_date, claim.frequency)?;
        let parts = u32::try_from(periods.len())
            .map_err(|_| CoreError::InvalidSchedule("too many periods".into()))?;
        if parts == 0 {
            return Err(CoreError::InvalidSchedule(
                "date range produced no periods".into(),
            ));
        }

        let scale = minor_units(&claim.currency);
        let split = divide_with_remainder(claim.total_amount, parts, scale).ok_or_else(|| {
            CoreError::InvalidSchedule(format!(
                "cannot divide {} into {parts} periods",
                claim.total_amount
            ))
        })?;
        if split.share <= Decimal::ZERO {
            return Err(CoreError::InvalidSchedule(format!(
                "{} {} is too small to spread over {parts} periods",
                claim.total_amount, claim.currency
            )));
        }

        let entries: Vec<ScheduleEntry> = periods
            .into_iter()
            .zip(split.amounts())
            .zip(1..)
            .map(|((period, amount), number)| ScheduleEntry::new(claim.id, number, period, amount))
            .collect();
        Self::verify(claim, &entries)?;
        Ok(entries)
    }

    /// Checks that `entries` tile the claim's range exactly and sum to its total.
    pub fn verify(claim: &ClaimRight, entries: &[ScheduleEntry]) -> Result<(), CoreError> {
        let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
            return Err(CoreError::Integrity(format!(
                "claim right {} has an empty schedule",
                claim.id
            )));
        };
        if first.period_start != claim.start_date || last.period_end != claim.end_date {
            return Err(CoreError::Integrity(format!(
                "schedule of claim right {} covers {}..{} instead of {}..{}",
                claim.id, first.period_start, last.period_end, claim.start_date, claim.end_date
            )));
        }
        for (expected, entry) in (1..).zip(entries) {
            if entry.period_number != expected || entry.claim_right_id != claim.id {
                return Err(CoreError::Integrity(format!(
                    "schedule of claim right {} is misnumbered at period {}",
                    claim.id, entry.period_number
                )));
            }
            if entry.amount <= Decimal::ZERO || entry.period_start > entry.period_end {
                return Err(CoreError::Integrity(format!(
                    "schedule entry {} of claim right {} is malformed",
                    entry.period_number, claim.id
                )));
            }
        }
        for pair in entries.windows(2) {
            if pair[0].period_end + Duration::days(1) != pair[1].period_start {
                return Err(CoreError::Integrity(format!(
                    "schedule of claim right {} has a gap or overlap after period {}",
                    claim.id, pair[0].period_number
                )));
            }
        }
        let total = checked_sum(entries.iter().map(|entry| entry.amount))
            .ok_or_else(|| CoreError::Integrity("schedule sum overflowed".into()))?;
        if total != claim.total_amount {
            return Err(CoreError::Integrity(format!(
                "schedule of claim right {} sums to {} instead of {}",
                claim.id, total, claim.total_amount
            )));
        }
        Ok(())
    }
}
