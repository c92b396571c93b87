//! Paging and translation of `me/events`.

use bridge_traits::http::{HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use core_transfer::models::{CalendarEventModel, CalendarEventTime};
use core_transfer::{ItemTranslator, Page, PageSource, Result, TransferError};
use tracing::warn;

use crate::types::{Connection, Event, Place};

/// Graph API base, pinned to the version the event fields were written for
pub const GRAPH_API_BASE: &str = "https://graph.facebook.com/v3.2/";

const EVENT_FIELDS: &str = "name,description,category,start_time,end_time,timezone,place";

/// Graph timestamp format, e.g. `2019-03-02T19:00:00-0800`
const GRAPH_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Maps Graph events into calendar events of one calendar.
#[derive(Debug, Clone)]
pub struct EventTranslator {
    calendar_id: String,
}

impl EventTranslator {
    pub fn new(calendar_id: impl Into<String>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
        }
    }
}

impl ItemTranslator<Event> for EventTranslator {
    type Payload = CalendarEventModel;

    fn translate(&self, event: &Event) -> Result<CalendarEventModel> {
        let timezone = event.timezone.as_deref().unwrap_or_default();

        Ok(CalendarEventModel {
            calendar_id: self.calendar_id.clone(),
            title: event.name.clone().unwrap_or_default(),
            notes: event.description.clone(),
            location: Some(format_location(event.place.as_ref())),
            start_time: event_time(event.start_time.as_deref(), timezone),
            end_time: event_time(event.end_time.as_deref(), timezone),
        })
    }
}

/// `name`, plus `\ncity,state\ncountry` when the place has a location.
pub fn format_location(place: Option<&Place>) -> String {
    let Some(place) = place else {
        return String::new();
    };

    let mut location = place.name.clone().unwrap_or_default();
    if let Some(address) = &place.location {
        location.push_str(&format!(
            "\n{},{}\n{}",
            address.city.as_deref().unwrap_or_default(),
            address.state.as_deref().unwrap_or_default(),
            address.country.as_deref().unwrap_or_default(),
        ));
    }
    location
}

/// Parse a Graph timestamp and express it in the event's zone.
///
/// A blank timezone means UTC. A zone name the tz database does not know
/// keeps the offset Graph sent.
pub fn event_time(raw: Option<&str>, timezone: &str) -> Option<CalendarEventTime> {
    let raw = raw?.trim();
    let parsed = DateTime::parse_from_str(raw, GRAPH_TIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw));

    let date_time = match parsed {
        Ok(date_time) => date_time,
        Err(e) => {
            warn!(value = raw, error = %e, "Skipping unparseable event time");
            return None;
        }
    };

    let timezone = timezone.trim();
    if timezone.is_empty() {
        return Some(CalendarEventTime::utc(date_time.with_timezone(&Utc)));
    }

    match timezone.parse::<Tz>() {
        Ok(zone) => Some(CalendarEventTime::new(
            date_time.with_timezone(&zone).fixed_offset(),
            false,
        )),
        Err(e) => {
            warn!(timezone, error = %e, "Unknown event timezone, keeping Graph offset");
            Some(CalendarEventTime::new(date_time, false))
        }
    }
}

/// `me/events` as a [`PageSource`].
#[derive(Debug, Clone)]
pub struct EventsSource {
    base_url: String,
    translator: EventTranslator,
}

impl EventsSource {
    pub fn new(translator: EventTranslator) -> Self {
        Self::with_base_url(GRAPH_API_BASE, translator)
    }

    pub fn with_base_url(base_url: impl Into<String>, translator: EventTranslator) -> Self {
        Self {
            base_url: base_url.into(),
            translator,
        }
    }
}

impl PageSource for EventsSource {
    type Item = CalendarEventModel;

    fn page_request(&self, cursor: Option<&str>) -> Result<HttpRequest> {
        let mut url = format!("{}me/events?fields={}", self.base_url, EVENT_FIELDS);
        if let Some(after) = cursor {
            url.push_str("&after=");
            url.push_str(&urlencoding::encode(after));
        }
        Ok(HttpRequest::get(url))
    }

    fn parse_page(&self, response: &HttpResponse) -> Result<Page<CalendarEventModel>> {
        let connection: Connection<Event> =
            response.json().map_err(|e| TransferError::TransientIo {
                status: Some(response.status),
                message: format!("Unexpected events response: {}", e),
                body: Some(response.text_lossy()),
            })?;

        let events = connection
            .data
            .iter()
            .map(|event| self.translator.translate(event))
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(
            events,
            connection.after_cursor().map(str::to_string),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    #[test]
    fn test_location_formatting() {
        assert_eq!(format_location(None), "");

        let place = Place {
            name: Some("Hacker Square".to_string()),
            location: None,
        };
        assert_eq!(format_location(Some(&place)), "Hacker Square");

        let place = Place {
            name: Some("Hacker Square".to_string()),
            location: Some(Location {
                city: Some("Menlo Park".to_string()),
                state: Some("CA".to_string()),
                country: None,
            }),
        };
        assert_eq!(format_location(Some(&place)), "Hacker Square\nMenlo Park,CA\n");
    }

    #[test]
    fn test_event_time_offsets() {
        let local = event_time(Some("2019-03-02T19:00:00-0800"), "America/Los_Angeles").unwrap();
        assert_eq!(local.date_time.offset().local_minus_utc(), -8 * 3600);
        assert!(!local.date_only);

        let paris = event_time(Some("2019-03-02T19:00:00-0800"), "Europe/Paris").unwrap();
        assert_eq!(paris.date_time.to_rfc3339(), "2019-03-03T04:00:00+01:00");

        let summer = event_time(Some("2019-07-02T19:00:00+0000"), "America/Los_Angeles").unwrap();
        assert_eq!(summer.date_time.to_rfc3339(), "2019-07-02T12:00:00-07:00");

        let unknown = event_time(Some("2019-03-02T19:00:00-0800"), "Mars/Olympus").unwrap();
        assert_eq!(unknown.date_time.offset().local_minus_utc(), -8 * 3600);

        let utc = event_time(Some("2019-03-02T19:00:00-0800"), "  ").unwrap();
        assert_eq!(utc.date_time.offset().local_minus_utc(), 0);
        assert_eq!(utc.date_time.to_rfc3339(), "2019-03-03T03:00:00+00:00");

        assert!(event_time(None, "UTC").is_none());
        assert!(event_time(Some("yesterday"), "UTC").is_none());
    }

    #[test]
    fn test_translate_event() {
        let event = Event {
            id: "937644721".to_string(),
            name: Some("Test Event".to_string()),
            description: Some("Bring snacks".to_string()),
            start_time: Some("2019-03-02T19:00:00+0000".to_string()),
            ..Default::default()
        };

        let model = EventTranslator::new("cal-1").translate(&event).unwrap();
        assert_eq!(model.calendar_id, "cal-1");
        assert_eq!(model.title, "Test Event");
        assert_eq!(model.notes.as_deref(), Some("Bring snacks"));
        assert_eq!(model.location.as_deref(), Some(""));
        assert!(model.start_time.is_some());
        assert!(model.end_time.is_none());
    }

    #[test]
    fn test_page_request_with_cursor() {
        let source = EventsSource::new(EventTranslator::new("cal-1"));

        let first = source.page_request(None).unwrap();
        assert_eq!(
            first.url,
            "https://graph.facebook.com/v3.2/me/events?fields=name,description,category,start_time,end_time,timezone,place"
        );

        let next = source.page_request(Some("QVFI=")).unwrap();
        assert!(next.url.ends_with("&after=QVFI%3D"));
    }
}
