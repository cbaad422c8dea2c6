use std::fmt;

use serde::Serialize;

use crate::models::Coordinate;

/// Why a device position could not be obtained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GeolocationFailure {
    /// The user or the platform refused access.
    Denied,
    /// No geolocation capability, or it failed to produce a fix.
    Unavailable(String),
}

impl fmt::Display for GeolocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeolocationFailure::Denied => f.write_str("permission denied"),
            GeolocationFailure::Unavailable(reason) => write!(f, "{reason}"),
        }
    }
}

pub type PositionOutcome = Result<Coordinate, GeolocationFailure>;

/// One-shot source of the device's current position.
///
/// Implementations call `done` exactly once, possibly after returning.
pub trait PositionSource {
    fn current_position(&self, done: Box<dyn FnOnce(PositionOutcome)>);
}

/// Source that always answers with the same outcome. Useful for hosts
/// without a geolocation capability and for tests.
#[derive(Clone, Debug)]
pub struct FixedPosition(pub PositionOutcome);

impl PositionSource for FixedPosition {
    fn current_position(&self, done: Box<dyn FnOnce(PositionOutcome)>) {
        done(self.0.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn fixed_source_answers_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        FixedPosition(Ok(Coordinate::new(-23.5, -46.6)))
            .current_position(Box::new(move |o| sink.borrow_mut().push(o)));
        assert_eq!(*seen.borrow(), vec![Ok(Coordinate::new(-23.5, -46.6))]);
    }
}
