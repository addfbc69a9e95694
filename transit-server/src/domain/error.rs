//! Domain error types.
//!
//! These errors represent validation failures when building routes and
//! schedules. They are distinct from store and request errors.

use super::{RouteId, SubRouteId};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// The sub-route does not exist on the route
    #[error("sub-route {sub_route} does not belong to route {route}")]
    UnknownSubRoute { route: RouteId, sub_route: SubRouteId },

    /// The route has sub-routes but the schedule names none
    #[error("route {0} has sub-routes; a schedule must name one")]
    SubRouteRequired(RouteId),

    /// A route lists the same sub-route id twice
    #[error("route {route} has duplicate sub-route {sub_route}")]
    DuplicateSubRoute { route: RouteId, sub_route: SubRouteId },

    /// A schedule applies to no weekday
    #[error("schedule must apply to at least one weekday")]
    NoWeekdays,

    /// Validity window ends before it starts
    #[error("validity window ends before it starts")]
    InvertedValidity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let route = RouteId::parse("R1").unwrap();
        let sub_route = SubRouteId::parse("S9").unwrap();

        let err = DomainError::UnknownSubRoute {
            route: route.clone(),
            sub_route: sub_route.clone(),
        };
        assert_eq!(err.to_string(), "sub-route S9 does not belong to route R1");

        let err = DomainError::SubRouteRequired(route.clone());
        assert_eq!(
            err.to_string(),
            "route R1 has sub-routes; a schedule must name one"
        );

        let err = DomainError::DuplicateSubRoute { route, sub_route };
        assert_eq!(err.to_string(), "route R1 has duplicate sub-route S9");

        let err = DomainError::NoWeekdays;
        assert_eq!(err.to_string(), "schedule must apply to at least one weekday");

        let err = DomainError::InvertedValidity;
        assert_eq!(err.to_string(), "validity window ends before it starts");
    }
}
