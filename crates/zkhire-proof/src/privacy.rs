use zkhire_core::PrivacyMetrics;

use crate::eligibility::EligibilityReport;

/// Weight of revealed skill information.
pub const SKILLS_WEIGHT: f64 = 0.3;
/// Weight of revealed location information.
pub const LOCATION_WEIGHT: f64 = 0.4;
/// Weight of revealed salary information.
pub const SALARY_WEIGHT: f64 = 0.5;
/// Flat bonus when a nullifier protects against replay.
pub const NULLIFIER_BONUS: f64 = 5.0;

/// Scores how much private information a flow disclosed (100 = nothing).
pub struct PrivacyScorer;

impl PrivacyScorer {
    /// `100 - 0.3·skills - 0.4·location - 0.5·salary (+5 with a nullifier)`,
    /// clamped to `[0, 100]`.
    pub fn score(metrics: &PrivacyMetrics) -> u8 {
        let mut raw = 100.0
            - SKILLS_WEIGHT * metrics.skills_revealed_pct
            - LOCATION_WEIGHT * metrics.location_revealed_pct
            - SALARY_WEIGHT * metrics.salary_revealed_pct;
        if metrics.has_nullifier {
            raw += NULLIFIER_BONUS;
        }
        if raw.is_nan() {
            return 0;
        }
        raw.clamp(0.0, 100.0).round() as u8
    }

    /// Disclosure implied by handing an eligibility report to the applicant.
    ///
    /// Nothing leaks when reasons are withheld. When they are exposed, each
    /// failed constraint names the attribute it concerns.
    pub fn metrics_for(
        report: &EligibilityReport,
        reasons_exposed: bool,
        has_nullifier: bool,
    ) -> PrivacyMetrics {
        if !reasons_exposed {
            return PrivacyMetrics {
                has_nullifier,
                ..Default::default()
            };
        }

        let skills_revealed_pct = if report.skills_checked == 0 {
            0.0
        } else {
            report.failed_skills() as f64 / report.skills_checked as f64 * 100.0
        };

        PrivacyMetrics {
            skills_revealed_pct,
            location_revealed_pct: if report.region_failed() { 100.0 } else { 0.0 },
            salary_revealed_pct: if report.salary_failed() { 100.0 } else { 0.0 },
            has_nullifier,
        }
    }
}
