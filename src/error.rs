use crate::point::Point;
use plotters::drawing::DrawingAreaErrorKind;
use std::fmt;
use thiserror::Error;

/// Which end of the route a rejected point was meant to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointRole {
    Start,
    Target,
}

impl fmt::Display for PointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointRole::Start => write!(f, "start"),
            PointRole::Target => write!(f, "target"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidReason {
    OutOfBounds,
    Blocked,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::OutOfBounds => write!(f, "out of bounds"),
            InvalidReason::Blocked => write!(f, "blocked"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {role} point {point}: {reason}")]
pub struct InvalidPointError {
    pub role: PointRole,
    pub point: Point,
    pub reason: InvalidReason,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidPoint(#[from] InvalidPointError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("plotting failed: {0}")]
    Plot(String),

    #[error("unknown environment `{0}`")]
    UnknownEnvironment(String),

    #[error("report at {0} has no recorded generations")]
    EmptyReport(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Error::Plot(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
