use crate::Result;
use crate::model::{Chord, ChordEnd, Group};
use flowchord_core::{ExpandedMatrix, LabelIndex};
use flowchord_layout::{ChordOptions, Subgroup};

fn chord_end(s: Subgroup) -> ChordEnd {
    ChordEnd {
        index: s.index,
        subindex: s.subindex,
        start_angle: s.start_angle,
        end_angle: s.end_angle,
        value: s.value,
    }
}

/// Runs the circular layout over an expanded matrix.
///
/// Groups, subgroups and chords keep the caller's order: rows first, then columns, each in input
/// order. `labels` must come from the same `prepare` call as `expanded`.
pub fn run_layout(
    expanded: &ExpandedMatrix,
    labels: &LabelIndex,
    padding: f64,
) -> Result<(Vec<Group>, Vec<Chord>)> {
    let options = ChordOptions {
        padding,
        sort_groups: None,
        sort_subgroups: None,
        sort_chords: None,
    };
    let out = flowchord_layout::layout(expanded.rows(), &options)?;
    debug_assert_eq!(out.groups.len(), labels.len());

    let groups = out
        .groups
        .into_iter()
        .map(|g| Group {
            index: g.index,
            start_angle: g.start_angle,
            end_angle: g.end_angle,
            angle: (g.start_angle + g.end_angle) / 2.0,
            value: g.value,
            role: labels.role_for(g.index),
        })
        .collect();
    let chords = out
        .chords
        .into_iter()
        .map(|c| Chord {
            source: chord_end(c.source),
            target: chord_end(c.target),
        })
        .collect();
    Ok((groups, chords))
}
