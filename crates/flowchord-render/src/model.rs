use crate::geometry::polar_angle;
use flowchord_core::{LabelIndex, Role};
use serde::{Deserialize, Serialize};

/// One category's arc on the ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Midpoint of the span; drives label rotation and tooltip side.
    pub angle: f64,
    pub value: f64,
    pub role: Role,
}

impl Group {
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn contains_angle(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.end_angle
    }
}

/// One end of a ribbon: the slice of group `index` reserved for its flow to `subindex`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChordEnd {
    pub index: usize,
    pub subindex: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub source: ChordEnd,
    pub target: ChordEnd,
}

impl Chord {
    pub fn touches(&self, index: usize) -> bool {
        self.source.index == index || self.target.index == index
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordDiagramLayout {
    pub width: f64,
    pub height: f64,
    /// Translation of the ring centre inside the canvas.
    pub center_x: f64,
    pub center_y: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub labels: LabelIndex,
    pub groups: Vec<Group>,
    pub chords: Vec<Chord>,
}

impl ChordDiagramLayout {
    pub fn label_for(&self, index: usize) -> &str {
        self.labels.label_for(index)
    }

    pub fn role_for(&self, index: usize) -> Role {
        self.labels.role_for(index)
    }

    pub fn group(&self, index: usize) -> &Group {
        &self.groups[index]
    }

    /// Group under a point given relative to the ring centre, if the point lies on the rim.
    pub fn group_at(&self, x: f64, y: f64) -> Option<usize> {
        let r = x.hypot(y);
        if r < self.inner_radius || r > self.outer_radius {
            return None;
        }
        let angle = polar_angle(x, y);
        self.groups
            .iter()
            .find(|g| g.contains_angle(angle))
            .map(|g| g.index)
    }

    /// Same as [`Self::group_at`] for a point in canvas coordinates.
    pub fn group_at_canvas(&self, x: f64, y: f64) -> Option<usize> {
        self.group_at(x - self.center_x, y - self.center_y)
    }

    pub fn total_flow(&self) -> f64 {
        self.chords.iter().map(|c| c.source.value).sum()
    }
}
