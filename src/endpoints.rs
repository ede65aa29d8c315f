//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/people/{person_id}', use [format_endpoint].

/// The route to list and create people.
pub const PEOPLE: &str = "/api/people";
/// The route to get or delete a single person.
pub const PERSON: &str = "/api/people/{person_id}";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to list and record transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the per-person income and expense report.
pub const PEOPLE_REPORT: &str = "/api/reports/people";
/// The route for the per-category income and expense report.
pub const CATEGORIES_REPORT: &str = "/api/reports/categories";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/people/{person_id}', '{person_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
