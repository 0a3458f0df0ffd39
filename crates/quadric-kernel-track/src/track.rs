//! Region tracks along a directed line.
//!
//! A [`Track`] collects raw boundary crossings ([`TPartial`]) from any
//! number of regions, then [`Track::build_link`] orders them and assembles a
//! contiguous list of [`TUnit`] segments, each tagged with the region the
//! line passes through. Stretches outside every region belong to the void
//! region [`VOID_REGION`].

use std::cmp::Ordering;

use quadric_kernel_math::{Tolerance, V3D};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::Line;

/// Region id used for segments outside every region.
pub const VOID_REGION: i32 = 0;

/// Direction of a boundary crossing. Leaving sorts before entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Crossing {
    /// The line leaves the region.
    Leave = -1,
    /// The line enters the region.
    Enter = 1,
}

/// A raw, unordered crossing event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TPartial {
    /// Region crossed.
    pub region: i32,
    /// Enter or leave.
    pub crossing: Crossing,
    /// Crossing point.
    pub point: V3D,
    /// Distance of `point` from the track origin.
    pub distance: f64,
}

impl TPartial {
    /// Order by distance; events closer than the crossing tolerance order
    /// leave-before-enter.
    pub fn compare(&self, other: &Self) -> Ordering {
        if (self.distance - other.distance).abs() <= Tolerance::DEFAULT.crossing {
            self.crossing.cmp(&other.crossing)
        } else {
            self.distance.total_cmp(&other.distance)
        }
    }
}

/// A finished segment of a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TUnit {
    /// Region the segment lies in.
    pub region: i32,
    /// Entry point.
    pub start: V3D,
    /// Exit point.
    pub end: V3D,
    /// Distance from the track origin to `end`.
    pub distance: f64,
    /// Length of the segment.
    pub length: f64,
}

impl TUnit {
    fn new(region: i32, start: V3D, end: V3D, origin: &V3D) -> Self {
        Self {
            region,
            start,
            end,
            distance: origin.distance(&end),
            length: start.distance(&end),
        }
    }
}

/// A directed line split into region segments.
#[derive(Debug, Clone)]
pub struct Track {
    line: Line,
    init_region: i32,
    units: Vec<TUnit>,
    partials: Vec<TPartial>,
}

impl Track {
    /// Track starting at `origin` inside `init_region`.
    pub fn new(origin: V3D, direction: V3D, init_region: i32) -> Result<Self> {
        Ok(Self::from_line(Line::new(origin, direction)?, init_region))
    }

    /// Track along an existing line.
    pub fn from_line(line: Line, init_region: i32) -> Self {
        Self {
            line,
            init_region,
            units: Vec::new(),
            partials: Vec::new(),
        }
    }

    /// The line the track follows.
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Start of the track.
    pub fn origin(&self) -> V3D {
        self.line.origin()
    }

    /// Unit direction of travel.
    pub fn direction(&self) -> V3D {
        self.line.direction()
    }

    /// Region containing the origin.
    pub fn init_region(&self) -> i32 {
        self.init_region
    }

    /// Finished segments in order.
    pub fn units(&self) -> &[TUnit] {
        &self.units
    }

    /// Raw crossing events in insertion order.
    pub fn partials(&self) -> &[TPartial] {
        &self.partials
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True if no segments have been built.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterate over the segments.
    pub fn iter(&self) -> std::slice::Iter<'_, TUnit> {
        self.units.iter()
    }

    /// Distance from the origin to the end of the last segment.
    pub fn total_length(&self) -> f64 {
        self.units.last().map_or(0.0, |u| u.distance)
    }

    /// Region of the segment covering `distance`, if any.
    pub fn region_at(&self, distance: f64) -> Option<i32> {
        if distance < 0.0 {
            return None;
        }
        let idx = self.units.partition_point(|u| u.distance < distance);
        self.units.get(idx).map(|u| u.region)
    }

    /// Record a crossing of `region` at `pt`.
    pub fn add_point(&mut self, region: i32, crossing: Crossing, pt: V3D) {
        let distance = self.origin().distance(&pt);
        self.partials.push(TPartial {
            region,
            crossing,
            point: pt,
            distance,
        });
    }

    /// Insert a segment from `start` to `end`, keeping segments ordered by
    /// distance from the origin. Returns the insertion index.
    pub fn add_tunit(&mut self, region: i32, start: V3D, end: V3D) -> usize {
        let unit = TUnit::new(region, start, end, &self.origin());
        let idx = self.units.partition_point(|u| u.distance <= unit.distance);
        self.units.insert(idx, unit);
        idx
    }

    /// 0 if the segments run without gaps from the origin, otherwise the
    /// 1-based index of the segment that starts after the first gap.
    pub fn non_complete(&self) -> usize {
        let tol = Tolerance::DEFAULT.track_gap;
        let Some(first) = self.units.first() else {
            return 0;
        };
        if first.start.distance(&self.origin()) > tol {
            return 1;
        }
        self.units
            .windows(2)
            .position(|w| w[0].end.distance(&w[1].start) > tol)
            .map_or(0, |i| i + 2)
    }

    /// Merge neighbouring segments of the same region.
    ///
    /// The merged segment keeps the first start and takes end, distance and
    /// length from the second.
    pub fn remove_co_joins(&mut self) {
        let mut i = 0;
        while i + 1 < self.units.len() {
            if self.units[i].region == self.units[i + 1].region {
                let next = self.units.remove(i + 1);
                let unit = &mut self.units[i];
                unit.end = next.end;
                unit.distance = next.distance;
                unit.length = next.length;
            } else {
                i += 1;
            }
        }
    }

    /// Assemble the segments from the recorded crossings.
    ///
    /// Replaces any existing segments. Gaps between leaving one region and
    /// entering the next become void segments; segments shorter than the
    /// gap tolerance are dropped. An event that sorts after one further
    /// along the line (a tie inside the crossing tolerance) is moved onto
    /// the earlier cut, so segment distances never decrease. On error the
    /// track is unchanged.
    pub fn build_link(&mut self) -> Result<()> {
        let origin = self.origin();
        let gap = Tolerance::DEFAULT.track_gap;
        let events = self.sorted_partials();

        let mut units = Vec::with_capacity(events.len() + 1);
        let mut current = self.init_region;
        let mut cursor = origin;
        let mut cursor_distance = 0.0;
        let mut push = |region: i32, from: V3D, to: V3D| {
            let unit = TUnit::new(region, from, to, &origin);
            if unit.length > gap {
                units.push(unit);
            }
        };

        for event in &events {
            let (at, at_distance) = if event.distance < cursor_distance {
                (cursor, cursor_distance)
            } else {
                (event.point, event.distance)
            };
            match event.crossing {
                Crossing::Leave => {
                    if event.region != current {
                        log::debug!(
                            "track: leave {} at {} while in {}",
                            event.region,
                            event.distance,
                            current
                        );
                        return Err(TrackError::UnmatchedLeave {
                            region: event.region,
                            current,
                            distance: event.distance,
                        });
                    }
                    push(current, cursor, at);
                    current = VOID_REGION;
                }
                Crossing::Enter => {
                    if current != VOID_REGION {
                        log::debug!(
                            "track: enter {} at {} while in {}",
                            event.region,
                            event.distance,
                            current
                        );
                        return Err(TrackError::OverlappingEnter {
                            region: event.region,
                            current,
                            distance: event.distance,
                        });
                    }
                    push(VOID_REGION, cursor, at);
                    current = event.region;
                }
            }
            cursor = at;
            cursor_distance = at_distance;
        }
        if current != VOID_REGION {
            return Err(TrackError::Unterminated { region: current });
        }

        log::debug!(
            "track: {} crossings -> {} segments",
            events.len(),
            units.len()
        );
        self.units = units;
        self.remove_co_joins();
        Ok(())
    }

    /// Partials sorted by distance, with leave-before-enter inside each run
    /// of events that lie within the crossing tolerance of the run's first.
    fn sorted_partials(&self) -> Vec<TPartial> {
        let tol = Tolerance::DEFAULT.crossing;
        let mut events = self.partials.clone();
        events.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let mut start = 0;
        while start < events.len() {
            let base = events[start].distance;
            let end = start
                + events[start..]
                    .iter()
                    .take_while(|e| e.distance - base <= tol)
                    .count();
            events[start..end].sort_by_key(|e| e.crossing);
            start = end;
        }
        events
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a TUnit;
    type IntoIter = std::slice::Iter<'a, TUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}
