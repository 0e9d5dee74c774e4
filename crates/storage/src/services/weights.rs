//! Weight redistribution over a hackathon's evaluation parameters.
//!
//! All weights are percentages. Every operation leaves the selected set
//! summing to exactly [`TOTAL_WEIGHT`]: values are rounded to whole
//! percentages and the rounding residual is folded into the largest weights.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Parameter;

pub const TOTAL_WEIGHT: f64 = 100.0;
pub const MIN_WEIGHT: f64 = 1.0;
/// Maximum distance from [`TOTAL_WEIGHT`] still accepted by [`is_weight_valid`].
pub const WEIGHT_TOLERANCE: f64 = 0.1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightError {
    #[error("Parameter {0} not found")]
    UnknownParameter(Uuid),

    #[error("Parameter {0} is not selected")]
    NotSelected(Uuid),
}

/// New state of a parameter touched by a redistribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct WeightChange {
    pub parameter_id: Uuid,
    pub weight: f64,
    pub selected: bool,
}

/// Clamps a user supplied weight to a whole percentage in `[1, 100]`.
pub fn clamp_weight(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_WEIGHT;
    }
    value.round().clamp(MIN_WEIGHT, TOTAL_WEIGHT)
}

/// Sum of the selected parameters' weights.
pub fn active_total(params: &[Parameter]) -> f64 {
    params.iter().filter(|p| p.selected).map(|p| p.weight).sum()
}

/// True when at least one parameter is selected, every selected weight is at
/// least [`MIN_WEIGHT`] and the selected weights total 100.
pub fn is_weight_valid(params: &[Parameter]) -> bool {
    let mut selected = params.iter().filter(|p| p.selected).peekable();
    selected.peek().is_some()
        && selected.all(|p| p.weight >= MIN_WEIGHT)
        && (active_total(params) - TOTAL_WEIGHT).abs() < WEIGHT_TOLERANCE
}

/// Flips `selected` on one parameter and rebalances the selected set.
///
/// Selecting gives every selected parameter an equal share. Deselecting
/// hands the removed weight to the remaining parameters in proportion to
/// their current weights; with nothing left selected the weight is dropped.
pub fn toggle(params: &mut [Parameter], parameter_id: Uuid) -> Result<Vec<WeightChange>, WeightError> {
    let idx = position(params, parameter_id)?;
    let before = snapshot(params);

    let now_selected = !params[idx].selected;
    params[idx].selected = now_selected;

    if now_selected {
        let selected = selected_indices(params, None);
        let share = (TOTAL_WEIGHT / selected.len() as f64).round();
        for &i in &selected {
            params[i].weight = share;
        }
        settle(params, &selected, TOTAL_WEIGHT);
    } else {
        let released = params[idx].weight;
        params[idx].weight = 0.0;

        let remaining = selected_indices(params, None);
        if !remaining.is_empty() {
            let sum_remaining: f64 = remaining.iter().map(|&i| params[i].weight).sum();
            let count = remaining.len() as f64;
            for &i in &remaining {
                let old = params[i].weight;
                let bonus = if sum_remaining > 0.0 {
                    released * old / sum_remaining
                } else {
                    released / count
                };
                params[i].weight = (old + bonus).round();
            }
            settle(params, &remaining, TOTAL_WEIGHT);
        }
    }

    Ok(diff(&before, params, Some(parameter_id)))
}

/// Sets one selected parameter's weight and rescales the other selected
/// parameters so the set sums to 100 again.
///
/// A lone selected parameter always ends at 100 whatever the input.
/// Otherwise the value is capped so every other selected parameter keeps at
/// least [`MIN_WEIGHT`].
pub fn adjust_weight(
    params: &mut [Parameter],
    parameter_id: Uuid,
    value: f64,
) -> Result<Vec<WeightChange>, WeightError> {
    let idx = position(params, parameter_id)?;
    if !params[idx].selected {
        return Err(WeightError::NotSelected(parameter_id));
    }
    let before = snapshot(params);

    let others = selected_indices(params, Some(idx));
    if others.is_empty() {
        params[idx].weight = TOTAL_WEIGHT;
        return Ok(diff(&before, params, Some(parameter_id)));
    }

    let count = others.len() as f64;
    let value = clamp_weight(value).min(TOTAL_WEIGHT - count * MIN_WEIGHT);
    let remaining = TOTAL_WEIGHT - value;
    let sum_others: f64 = others.iter().map(|&i| params[i].weight).sum();

    for &i in &others {
        let old = params[i].weight;
        let share = if sum_others > 0.0 {
            (old / sum_others * remaining).round()
        } else {
            (remaining / count).round()
        };
        params[i].weight = share.max(MIN_WEIGHT);
    }
    params[idx].weight = value;
    settle(params, &others, remaining);

    Ok(diff(&before, params, Some(parameter_id)))
}

fn position(params: &[Parameter], parameter_id: Uuid) -> Result<usize, WeightError> {
    params
        .iter()
        .position(|p| p.parameter_id == parameter_id)
        .ok_or(WeightError::UnknownParameter(parameter_id))
}

fn selected_indices(params: &[Parameter], except: Option<usize>) -> Vec<usize> {
    params
        .iter()
        .enumerate()
        .filter(|(i, p)| p.selected && Some(*i) != except)
        .map(|(i, _)| i)
        .collect()
}

/// Moves the rounding residual between `target` and the current sum of
/// `indices` onto the largest weights, keeping each in `[1, 100]`.
fn settle(params: &mut [Parameter], indices: &[usize], target: f64) {
    let mut residual = target - indices.iter().map(|&i| params[i].weight).sum::<f64>();
    if residual.abs() < f64::EPSILON {
        return;
    }

    let mut by_weight = indices.to_vec();
    by_weight.sort_by(|&a, &b| params[b].weight.total_cmp(&params[a].weight));

    for i in by_weight {
        let current = params[i].weight;
        let adjusted = (current + residual).clamp(MIN_WEIGHT, TOTAL_WEIGHT);
        residual -= adjusted - current;
        params[i].weight = adjusted;
        if residual.abs() < f64::EPSILON {
            break;
        }
    }
}

fn snapshot(params: &[Parameter]) -> Vec<(f64, bool)> {
    params.iter().map(|p| (p.weight, p.selected)).collect()
}

fn diff(before: &[(f64, bool)], params: &[Parameter], always: Option<Uuid>) -> Vec<WeightChange> {
    params
        .iter()
        .zip(before)
        .filter(|(p, (weight, selected))| {
            Some(p.parameter_id) == always || p.weight != *weight || p.selected != *selected
        })
        .map(|(p, _)| WeightChange {
            parameter_id: p.parameter_id,
            weight: p.weight,
            selected: p.selected,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn param(name: &str, weight: f64, selected: bool) -> Parameter {
        Parameter {
            parameter_id: Uuid::new_v4(),
            hackathon_id: Uuid::nil(),
            name: name.to_string(),
            description: format!("{name} description"),
            weight,
            selected,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn weights(params: &[Parameter]) -> Vec<f64> {
        params.iter().map(|p| p.weight).collect()
    }

    #[test]
    fn test_select_splits_equally() {
        let mut params = vec![param("a", 0.0, false), param("b", 0.0, false)];
        let id = params[0].parameter_id;
        toggle(&mut params, id).unwrap();
        assert_eq!(weights(&params), vec![100.0, 0.0]);

        let id = params[1].parameter_id;
        toggle(&mut params, id).unwrap();
        assert_eq!(weights(&params), vec![50.0, 50.0]);
        assert!(is_weight_valid(&params));
    }

    #[test]
    fn test_select_three_absorbs_rounding_residual() {
        let mut params = vec![
            param("a", 50.0, true),
            param("b", 50.0, true),
            param("c", 0.0, false),
        ];
        let id = params[2].parameter_id;
        toggle(&mut params, id).unwrap();

        let total = active_total(&params);
        assert!((total - 100.0).abs() < WEIGHT_TOLERANCE);
        assert!(params.iter().all(|p| p.weight == 33.0 || p.weight == 34.0));
    }

    #[test]
    fn test_deselect_one_of_five_preserves_proportions() {
        let mut params: Vec<Parameter> = (0..5)
            .map(|i| param(&format!("p{i}"), 20.0, true))
            .collect();
        let removed = params[4].parameter_id;

        let changes = toggle(&mut params, removed).unwrap();

        assert!(!params[4].selected);
        assert_eq!(params[4].weight, 0.0);
        assert!((active_total(&params) - 100.0).abs() < WEIGHT_TOLERANCE);
        for p in &params[..4] {
            assert_eq!(p.weight, 25.0);
        }
        assert_eq!(changes.len(), 5);
    }

    #[test]
    fn test_deselect_redistributes_proportionally() {
        let mut params = vec![
            param("a", 50.0, true),
            param("b", 30.0, true),
            param("c", 20.0, true),
        ];
        let id = params[0].parameter_id;
        toggle(&mut params, id).unwrap();
        assert_eq!(weights(&params), vec![0.0, 60.0, 40.0]);
    }

    #[test]
    fn test_deselect_last_drops_pool() {
        let mut params = vec![param("a", 100.0, true), param("b", 0.0, false)];
        let id = params[0].parameter_id;
        toggle(&mut params, id).unwrap();
        assert_eq!(active_total(&params), 0.0);
        assert!(!is_weight_valid(&params));
    }

    #[test]
    fn test_toggle_sequences_converge_to_hundred() {
        let mut params: Vec<Parameter> = (0..7).map(|i| param(&format!("p{i}"), 0.0, false)).collect();
        let ids: Vec<Uuid> = params.iter().map(|p| p.parameter_id).collect();

        let sequence = [0, 1, 2, 3, 1, 4, 5, 6, 0, 2, 1, 3];
        for step in sequence {
            toggle(&mut params, ids[step]).unwrap();
            if params.iter().any(|p| p.selected) {
                assert!((active_total(&params) - 100.0).abs() < WEIGHT_TOLERANCE);
            }
        }
    }

    #[test]
    fn test_adjust_single_parameter_forces_hundred() {
        let mut params = vec![param("a", 100.0, true), param("b", 0.0, false)];
        let id = params[0].parameter_id;
        for value in [0.0, 12.0, 55.5, 250.0] {
            adjust_weight(&mut params, id, value).unwrap();
            assert_eq!(params[0].weight, 100.0);
        }
    }

    #[test]
    fn test_adjust_rescales_others() {
        let mut params = vec![
            param("a", 40.0, true),
            param("b", 40.0, true),
            param("c", 20.0, true),
        ];
        let id = params[0].parameter_id;
        adjust_weight(&mut params, id, 70.0).unwrap();
        assert_eq!(weights(&params), vec![70.0, 20.0, 10.0]);
    }

    #[test]
    fn test_adjust_clamps_input() {
        let mut params = vec![param("a", 50.0, true), param("b", 50.0, true)];
        let id = params[0].parameter_id;
        adjust_weight(&mut params, id, 0.0).unwrap();
        assert_eq!(weights(&params), vec![1.0, 99.0]);

        adjust_weight(&mut params, id, 180.0).unwrap();
        assert_eq!(weights(&params), vec![99.0, 1.0]);
    }

    #[test]
    fn test_adjust_with_zero_others_splits_remainder() {
        let mut params = vec![
            param("a", 100.0, true),
            param("b", 0.0, true),
            param("c", 0.0, true),
        ];
        let id = params[0].parameter_id;
        adjust_weight(&mut params, id, 60.0).unwrap();
        assert_eq!(weights(&params), vec![60.0, 20.0, 20.0]);
    }

    #[test]
    fn test_adjust_to_hundred_keeps_others_at_minimum() {
        let mut params = vec![
            param("a", 50.0, true),
            param("b", 30.0, true),
            param("c", 20.0, true),
        ];
        let id = params[0].parameter_id;
        adjust_weight(&mut params, id, 100.0).unwrap();

        assert_eq!(weights(&params), vec![98.0, 1.0, 1.0]);
        assert!(is_weight_valid(&params));
    }

    #[test]
    fn test_selected_weight_below_minimum_is_invalid() {
        let params = vec![param("a", 100.0, true), param("b", 0.0, true)];
        assert_eq!(active_total(&params), 100.0);
        assert!(!is_weight_valid(&params));
    }

    #[test]
    fn test_adjust_unselected_is_rejected() {
        let mut params = vec![param("a", 100.0, true), param("b", 0.0, false)];
        let id = params[1].parameter_id;
        assert_eq!(
            adjust_weight(&mut params, id, 30.0),
            Err(WeightError::NotSelected(id))
        );
    }

    #[test]
    fn test_unknown_parameter() {
        let mut params = vec![param("a", 100.0, true)];
        let id = Uuid::new_v4();
        assert_eq!(toggle(&mut params, id), Err(WeightError::UnknownParameter(id)));
    }

    #[test]
    fn test_validity_tolerance() {
        let params = vec![param("a", 33.35, true), param("b", 66.6, true)];
        assert!(is_weight_valid(&params));

        let params = vec![param("a", 33.0, true), param("b", 66.0, true)];
        assert!(!is_weight_valid(&params));
    }
}
