//! Station ranges and the payload capability set.
//!
//! Every station owns a zone of influence made of a back half-interval
//! (towards the previous station) and a front half-interval (towards the next
//! one). Quantity payloads ride on those halves and are combined when ranges
//! are merged.

use crate::models::Cell;
use std::fmt;

/// Capabilities the engine needs from a quantity value
///
/// Each quantity type supplies one implementation; the engine never looks at
/// a concrete payload type.
pub trait Payload: Clone + fmt::Debug {
    /// Rescale length-dependent quantities to a half-interval of `length` metres
    fn apportion(&mut self, length: f64);

    /// Absorb the payload of the range that directly follows this one
    fn merge(&mut self, next: &Self);

    /// Whether `next`, directly following this range, may share its report row
    fn is_mergeable(&self, next: &Self) -> bool;

    /// Hook called after a block zone truncated this half at `block_station`
    ///
    /// Length-dependent quantities have already been re-apportioned by then.
    fn cut_by_block(&mut self, _block_station: f64) {}

    /// Treatment label shown in the report
    fn describe(&self) -> String;

    /// Names of the payload's own report columns
    fn column_headers() -> Vec<&'static str>;

    /// Values for [`Payload::column_headers`], in the same order
    fn columns(&self) -> Vec<Cell>;
}

/// Unit payload of freshly partitioned, unclassified ranges
impl Payload for () {
    fn apportion(&mut self, _length: f64) {}

    fn merge(&mut self, _next: &Self) {}

    fn is_mergeable(&self, _next: &Self) -> bool {
        true
    }

    fn describe(&self) -> String {
        String::new()
    }

    fn column_headers() -> Vec<&'static str> {
        Vec::new()
    }

    fn columns(&self) -> Vec<Cell> {
        Vec::new()
    }
}

/// One side of a station's zone of influence
#[derive(Debug, Clone, PartialEq)]
pub struct HalfInterval<P> {
    pub parent_station: f64,
    pub edge_station: f64,
    pub value: P,
}

impl<P: Payload> HalfInterval<P> {
    pub fn length(&self) -> f64 {
        (self.edge_station - self.parent_station).abs()
    }

    fn clip(&mut self, lo: f64, hi: f64, block_station: f64) {
        self.parent_station = self.parent_station.clamp(lo, hi);
        self.edge_station = self.edge_station.clamp(lo, hi);
        let length = self.length();
        self.value.apportion(length);
        self.value.cut_by_block(block_station);
    }
}

/// Back and front half-intervals of one station
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionRange<P> {
    pub station: f64,
    pub back: HalfInterval<P>,
    pub front: HalfInterval<P>,
    /// Set once the range is excluded by a block zone
    pub is_null: bool,
}

/// A partitioned range before any quantity has been attached
pub type StationRange = CrossSectionRange<()>;

impl<P: Payload> CrossSectionRange<P> {
    pub fn back_edge(&self) -> f64 {
        self.back.edge_station
    }

    pub fn front_edge(&self) -> f64 {
        self.front.edge_station
    }

    /// Covered station length
    pub fn length(&self) -> f64 {
        self.front_edge() - self.back_edge()
    }

    /// Restrict the range to `[lo, hi]` after a block zone cut at `block_station`
    pub fn clip(&mut self, lo: f64, hi: f64, block_station: f64) {
        self.back.clip(lo, hi, block_station);
        self.front.clip(lo, hi, block_station);
    }

    /// Collapse the two halves into one merged range
    pub fn union_back_front(self) -> MergedRange<P> {
        let mut value = self.back.value;
        value.merge(&self.front.value);
        MergedRange {
            back_edge: self.back.edge_station,
            front_edge: self.front.edge_station,
            value,
            stations: vec![self.station],
        }
    }
}

impl StationRange {
    /// Range of `station` bounded by the given edges, without a quantity
    pub fn new(station: f64, back_edge: f64, front_edge: f64) -> Self {
        Self {
            station,
            back: HalfInterval {
                parent_station: station,
                edge_station: back_edge,
                value: (),
            },
            front: HalfInterval {
                parent_station: station,
                edge_station: front_edge,
                value: (),
            },
            is_null: false,
        }
    }

    /// Attach a station's quantity, apportioned to each half's length
    pub fn attach<P: Payload>(&self, payload: P) -> CrossSectionRange<P> {
        let mut back_value = payload.clone();
        back_value.apportion(self.back.length());
        let mut front_value = payload;
        front_value.apportion(self.front.length());

        CrossSectionRange {
            station: self.station,
            back: HalfInterval {
                parent_station: self.back.parent_station,
                edge_station: self.back.edge_station,
                value: back_value,
            },
            front: HalfInterval {
                parent_station: self.front.parent_station,
                edge_station: self.front.edge_station,
                value: front_value,
            },
            is_null: self.is_null,
        }
    }
}

/// Contiguous run of qualifying ranges collapsed into one report row
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRange<P> {
    pub back_edge: f64,
    pub front_edge: f64,
    pub value: P,
    /// Stations whose ranges make up this run, ascending
    pub stations: Vec<f64>,
}

impl<P> MergedRange<P> {
    pub fn length(&self) -> f64 {
        self.front_edge - self.back_edge
    }
}

impl<P: Payload> From<CrossSectionRange<P>> for MergedRange<P> {
    fn from(range: CrossSectionRange<P>) -> Self {
        range.union_back_front()
    }
}
