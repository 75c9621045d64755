//! Upcoming delivery-day computation.
//!
//! The shop delivers on configured weekdays; an order placed on a
//! delivery day itself only makes that day's run if it lands before the
//! configured cutoff time.

use chrono::{Datelike, Days, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::types::DeliveryDay;

/// Search horizon in days; guards against configs whose weekdays can
/// never match.
const MAX_LOOKAHEAD_DAYS: u64 = 35;

/// Fallback schedule when no delivery days are configured: Monday and
/// Thursday with no cutoff.
fn default_days() -> Vec<DeliveryDay> {
    vec![
        DeliveryDay {
            weekday: 1,
            cutoff: None,
        },
        DeliveryDay {
            weekday: 4,
            cutoff: None,
        },
    ]
}

/// A selectable delivery date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOption {
    pub date: chrono::NaiveDate,
    /// Cutoff attached to the weekday, echoed for display.
    pub cutoff: Option<NaiveTime>,
}

/// Compute the next `count` delivery dates from `now`.
///
/// Walks forward day by day keeping configured weekdays; today is
/// included only while its cutoff has not passed. Weekdays use the
/// 0 = Sunday convention of the configuration document.
#[must_use]
pub fn upcoming_options(days: &[DeliveryDay], now: NaiveDateTime, count: usize) -> Vec<DeliveryOption> {
    let days = if days.is_empty() {
        default_days()
    } else {
        days.to_vec()
    };

    let mut options = Vec::with_capacity(count);
    for offset in 0..MAX_LOOKAHEAD_DAYS {
        if options.len() >= count {
            break;
        }

        let Some(date) = now.date().checked_add_days(Days::new(offset)) else {
            break;
        };
        let weekday = u8::try_from(date.weekday().num_days_from_sunday()).unwrap_or(7);

        let Some(config) = days.iter().find(|d| d.weekday == weekday) else {
            continue;
        };

        let is_today = offset == 0;
        if is_today {
            if let Some(cutoff) = config.cutoff {
                if now.time() > cutoff {
                    continue;
                }
            }
        }

        options.push(DeliveryOption {
            date,
            cutoff: config.cutoff,
        });
    }

    options
}
