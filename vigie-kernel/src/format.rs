/**
 * ROW FORMATTER - Événements bruts → lignes affichables
 *
 * RÔLE :
 * Transforme une séquence ordonnée de StateEvent en ViewRow sans jamais
 * réordonner ni filtrer : même longueur, même ordre que la base.
 *
 * DEUX FORMES DE SORTIE :
 * - Historique : date absolue ("14 November 2023, 22:13:20 +00:00") + durée
 *   approximative entre start_time et end_time ("an hour", "3 days")
 * - Statut courant : temps écoulé depuis start_time ("12 minutes ago")
 *
 * Fonction pure de ses entrées (+ l'instant courant pour le temps relatif).
 */

use crate::error::DashboardError;
use crate::models::{StateEvent, ViewRow};
use crate::status::{StatusCode, Vocabulary};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};

const DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[day] [month repr:long] [year], [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
);

/// Libellé de durée pour un événement encore en cours (end_time NULL)
pub const ONGOING: &str = "ongoing";

#[derive(Debug, Clone, Copy)]
pub struct RowFormatter {
    display_offset: UtcOffset,
}

impl Default for RowFormatter {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl RowFormatter {
    pub fn new(display_offset: UtcOffset) -> Self {
        Self { display_offset }
    }

    /// Lignes de la page historique (vocabulaire Generic)
    pub fn history(&self, events: &[StateEvent]) -> Result<Vec<ViewRow>, DashboardError> {
        events.iter().map(|event| self.history_row(event)).collect()
    }

    /// Lignes de la page statut courant (vocabulaire Lines)
    pub fn current_status(
        &self,
        events: &[StateEvent],
        now: OffsetDateTime,
    ) -> Result<Vec<ViewRow>, DashboardError> {
        events
            .iter()
            .map(|event| current_status_row(event, now))
            .collect()
    }

    /// Date absolue au format d'affichage, dans le décalage configuré
    pub fn format_date_time(&self, instant: OffsetDateTime, unix: i64) -> Result<String, DashboardError> {
        let local = instant
            .checked_to_offset(self.display_offset)
            .ok_or(DashboardError::InvalidTimestamp(unix))?;
        Ok(local.format(DATE_TIME_FORMAT)?)
    }

    fn history_row(&self, event: &StateEvent) -> Result<ViewRow, DashboardError> {
        let code = StatusCode::try_from(event.state)?;
        let start = from_unix(event.start_time)?;
        let duration = match event.end_time {
            Some(end) => humanize(from_unix(end)? - start),
            None => ONGOING.to_string(),
        };

        Ok(ViewRow {
            service: event.description.clone(),
            status: code.label(Vocabulary::Generic).to_string(),
            bs_class: code.css_class().to_string(),
            duration: Some(duration),
            last_check: None,
            date_time: Some(self.format_date_time(start, event.start_time)?),
        })
    }
}

fn current_status_row(event: &StateEvent, now: OffsetDateTime) -> Result<ViewRow, DashboardError> {
    let code = StatusCode::try_from(event.state)?;
    let start = from_unix(event.start_time)?;

    Ok(ViewRow {
        service: event.description.clone(),
        status: code.label(Vocabulary::Lines).to_string(),
        bs_class: code.css_class().to_string(),
        duration: None,
        last_check: Some(relative_to(start, now)),
        date_time: None,
    })
}

fn from_unix(timestamp: i64) -> Result<OffsetDateTime, DashboardError> {
    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|_| DashboardError::InvalidTimestamp(timestamp))
}

/// "3 hours ago" si `instant` est passé, "in 3 hours" s'il est futur
pub fn relative_to(instant: OffsetDateTime, now: OffsetDateTime) -> String {
    let span = now - instant;
    if span.is_negative() {
        format!("in {}", humanize(span))
    } else {
        format!("{} ago", humanize(span))
    }
}

/// Durée approximative lisible, signe ignoré.
///
/// Chaque unité est arrondie indépendamment puis la première règle qui matche
/// gagne : 44s → "a few seconds", 90s → "2 minutes", 3661s → "an hour".
pub fn humanize(span: Duration) -> String {
    let secs = span.abs().as_seconds_f64();
    let seconds = secs.round();
    let minutes = (secs / 60.0).round();
    let hours = (secs / 3_600.0).round();
    let days = (secs / 86_400.0).round();
    // 146097 jours = 400 ans grégoriens = 4800 mois
    let months_exact = secs / 86_400.0 * 4_800.0 / 146_097.0;
    let months = months_exact.round();
    let years = (months_exact / 12.0).round();

    if seconds <= 44.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes as i64)
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{} hours", hours as i64)
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{} days", days as i64)
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{} months", months as i64)
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{} years", years as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    const T: i64 = 1_700_000_000; // 2023-11-14 22:13:20 UTC

    fn event(start: i64, end: Option<i64>, state: i64, name: &str) -> StateEvent {
        StateEvent {
            start_time: start,
            end_time: end,
            state,
            description: name.to_string(),
        }
    }

    #[test]
    fn test_humanize_thresholds() {
        let cases = [
            (0, "a few seconds"),
            (44, "a few seconds"),
            (45, "a minute"),
            (89, "a minute"),
            (90, "2 minutes"),
            (44 * 60, "44 minutes"),
            (45 * 60, "an hour"),
            (3661, "an hour"),
            (90 * 60, "2 hours"),
            (21 * 3600, "21 hours"),
            (22 * 3600, "a day"),
            (36 * 3600, "2 days"),
            (25 * 86_400, "25 days"),
            (26 * 86_400, "a month"),
            (60 * 86_400, "2 months"),
            (320 * 86_400, "a year"),
            (2 * 365 * 86_400, "2 years"),
        ];
        for (secs, expected) in cases {
            assert_eq!(humanize(Duration::seconds(secs)), expected, "{secs}s");
        }
    }

    #[test]
    fn test_humanize_ignores_sign() {
        assert_eq!(humanize(Duration::seconds(-3 * 3600)), "3 hours");
    }

    #[test]
    fn test_relative_to() {
        let now = datetime!(2024-01-01 12:00 UTC);
        assert_eq!(relative_to(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(relative_to(now + Duration::minutes(10), now), "in 10 minutes");
        assert_eq!(relative_to(now, now), "a few seconds ago");
    }

    #[test]
    fn test_history_row_shape() {
        let rows = RowFormatter::default()
            .history(&[event(T, Some(T + 3661), 0, "Line 1")])
            .unwrap();

        assert_eq!(
            rows,
            vec![ViewRow {
                service: "Line 1".into(),
                status: "OK".into(),
                bs_class: "label-success".into(),
                duration: Some("an hour".into()),
                last_check: None,
                date_time: Some("14 November 2023, 22:13:20 +00:00".into()),
            }]
        );
    }

    #[test]
    fn test_date_time_uses_display_offset() {
        let formatter = RowFormatter::new(offset!(+2));
        let rows = formatter.history(&[event(T, Some(T + 60), 2, "Line 2")]).unwrap();
        assert_eq!(rows[0].date_time.as_deref(), Some("15 November 2023, 00:13:20 +02:00"));
        assert_eq!(rows[0].status, "CRITICAL");
    }

    #[test]
    fn test_history_open_event_is_ongoing() {
        let rows = RowFormatter::default().history(&[event(T, None, 1, "Line 3")]).unwrap();
        assert_eq!(rows[0].duration.as_deref(), Some(ONGOING));
    }

    #[test]
    fn test_preserves_order_and_length() {
        let events: Vec<StateEvent> = (0..7)
            .map(|i| event(T - i * 600, Some(T - i * 600 + 30), i % 4, &format!("svc-{i}")))
            .collect();

        let rows = RowFormatter::default().history(&events).unwrap();
        assert_eq!(rows.len(), events.len());
        for (row, event) in rows.iter().zip(&events) {
            assert_eq!(row.service, event.description);
        }

        let now = datetime!(2023-11-15 00:00 UTC);
        let rows = RowFormatter::default().current_status(&events, now).unwrap();
        assert_eq!(rows.len(), events.len());
        assert!(rows.iter().zip(&events).all(|(r, e)| r.service == e.description));
    }

    #[test]
    fn test_current_status_row_shape() {
        let now = OffsetDateTime::from_unix_timestamp(T + 3 * 3600).unwrap();
        let rows = RowFormatter::default()
            .current_status(&[event(T, None, 2, "Line 4")], now)
            .unwrap();

        assert_eq!(rows[0].status, "LINES DOWN");
        assert_eq!(rows[0].bs_class, "label-danger");
        assert_eq!(rows[0].last_check.as_deref(), Some("3 hours ago"));
        assert!(rows[0].duration.is_none());
        assert!(rows[0].date_time.is_none());
    }

    #[test]
    fn test_unknown_state_fails_fast() {
        let events = [event(T, Some(T + 1), 0, "ok"), event(T, Some(T + 1), 5, "bad")];
        let err = RowFormatter::default().history(&events).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownStatusCode(5)));
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let err = RowFormatter::default()
            .history(&[event(i64::MAX, None, 0, "far")])
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidTimestamp(i64::MAX)));
    }
}
