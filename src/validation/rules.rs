//! Column width rules for telemetry rows

use crate::error::ValidationError;
use crate::types::{AppEvent, AppPerformance, AppUsage};

const SESSION_ID_MAX: usize = 255;
const KIND_MAX: usize = 50;
const URL_MAX: usize = 500;
const DOMAIN_MAX: usize = 255;
const LANGUAGE_MAX: usize = 10;
const IP_ADDRESS_MAX: usize = 45;
const GEO_MAX: usize = 100;
const TIMEZONE_MAX: usize = 50;
const USER_ID_MAX: usize = 255;
const NAME_MAX: usize = 100;
const GRAPHQL_QUERY_NAME_MAX: usize = 255;
const CLICK_TARGET_MAX: usize = 255;
const EFFECTIVE_CONNECTION_TYPE_MAX: usize = 10;

fn required(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    optional(field, Some(value), max)
}

fn optional(field: &'static str, value: Option<&str>, max: usize) -> Result<(), ValidationError> {
    match value {
        Some(value) => {
            let actual = value.chars().count();
            if actual > max {
                Err(ValidationError::TooLong { field, max, actual })
            } else {
                Ok(())
            }
        }
        None => Ok(()),
    }
}

pub fn validate_event(event: &AppEvent) -> Result<(), ValidationError> {
    required("sessionId", &event.session_id, SESSION_ID_MAX)?;
    required("eventType", &event.event_type, KIND_MAX)?;
    required("url", &event.url, usize::MAX)?;
    optional("domain", Some(&event.domain), DOMAIN_MAX)?;
    optional("language", Some(&event.language), LANGUAGE_MAX)?;
    optional("ipAddress", Some(&event.ip_address), IP_ADDRESS_MAX)?;
    optional("country", event.country.as_deref(), GEO_MAX)?;
    optional("region", event.region.as_deref(), GEO_MAX)?;
    optional("city", event.city.as_deref(), GEO_MAX)?;
    optional("timezone", event.timezone.as_deref(), TIMEZONE_MAX)?;
    optional("userId", event.user_id.as_deref(), USER_ID_MAX)
}

pub fn validate_performance(row: &AppPerformance) -> Result<(), ValidationError> {
    required("sessionId", &row.session_id, SESSION_ID_MAX)?;
    required("metricType", &row.metric_type, KIND_MAX)?;
    required("url", &row.url, URL_MAX)?;

    let details = &row.details;
    optional(
        "graphqlQueryName",
        details.graphql_query_name.as_deref(),
        GRAPHQL_QUERY_NAME_MAX,
    )?;
    optional("resourceType", details.resource_type.as_deref(), KIND_MAX)?;
    optional("connectionType", details.connection_type.as_deref(), KIND_MAX)?;
    optional(
        "effectiveConnectionType",
        details.effective_connection_type.as_deref(),
        EFFECTIVE_CONNECTION_TYPE_MAX,
    )
}

pub fn validate_usage(row: &AppUsage) -> Result<(), ValidationError> {
    required("sessionId", &row.session_id, SESSION_ID_MAX)?;
    required("actionType", &row.action_type, KIND_MAX)?;
    required("url", &row.url, URL_MAX)?;

    // Free-text details (queries, form values, stacks) are unbounded
    let details = &row.details;
    optional("paginationAction", details.pagination_action.as_deref(), KIND_MAX)?;
    optional("columnAction", details.column_action.as_deref(), KIND_MAX)?;
    optional("columnName", details.column_name.as_deref(), NAME_MAX)?;
    optional("searchAction", details.search_action.as_deref(), KIND_MAX)?;
    optional("clickTarget", details.click_target.as_deref(), CLICK_TARGET_MAX)?;
    optional("navigationAction", details.navigation_action.as_deref(), KIND_MAX)?;
    optional("exitType", details.exit_type.as_deref(), KIND_MAX)?;
    optional("formAction", details.form_action.as_deref(), KIND_MAX)?;
    optional("formField", details.form_field.as_deref(), NAME_MAX)?;
    optional("errorType", details.error_type.as_deref(), NAME_MAX)
}
