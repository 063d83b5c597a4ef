use crate::core::base::*;

use log::debug;
use std::collections::VecDeque;

/// Settings of the bound-constrained quasi-Newton minimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizerSettings {
    /// Number of correction pairs kept for the inverse Hessian estimate.
    pub history: usize,
    /// Stop when the objective changes by no more than
    /// `tolerance * max(1, |f|)` between iterations.
    pub tolerance: f64,
    pub max_iterations: usize,
    pub lower: f64,
    pub upper: f64,
}

impl Default for MinimizerSettings {
    fn default() -> Self {
        MinimizerSettings {
            history: 10,
            tolerance: 1e-9,
            max_iterations: 1000,
            lower: MIN_MULTIPLIER,
            upper: MAX_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinimizeResult {
    pub x: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

const ARMIJO: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 50;
const CURVATURE_EPSILON: f64 = 1e-10;

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    return a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
}

#[inline]
fn project(x: &mut [f64], lower: f64, upper: f64) {
    for v in x.iter_mut() {
        *v = v.clamp(lower, upper);
    }
}

/// Components pinned at a bound with the gradient pushing outward.
fn active_set(x: &[f64], g: &[f64], lower: f64, upper: f64) -> Vec<bool> {
    return x
        .iter()
        .zip(g.iter())
        .map(|(xi, gi)| (*xi <= lower && *gi > 0.0) || (*xi >= upper && *gi < 0.0))
        .collect();
}

/// Two-loop recursion on the free variables.
fn search_direction(g: &[f64], active: &[bool], pairs: &VecDeque<(Vec<f64>, Vec<f64>)>) -> Vec<f64> {
    let mut q: Vec<f64> = g
        .iter()
        .zip(active.iter())
        .map(|(gi, a)| if *a { 0.0 } else { *gi })
        .collect();
    let masked = |v: &[f64]| -> Vec<f64> {
        v.iter()
            .zip(active.iter())
            .map(|(vi, a)| if *a { 0.0 } else { *vi })
            .collect()
    };
    let mut alphas = Vec::with_capacity(pairs.len());
    let mut used = Vec::with_capacity(pairs.len());
    for (s, y) in pairs.iter().rev() {
        let s = masked(s);
        let y = masked(y);
        let sy = dot(&s, &y);
        if sy <= CURVATURE_EPSILON {
            continue;
        }
        let rho = 1.0 / sy;
        let alpha = rho * dot(&s, &q);
        for i in 0..q.len() {
            q[i] -= alpha * y[i];
        }
        alphas.push(alpha);
        used.push((s, y, rho));
    }
    if let Some((s, y, _)) = used.first() {
        let gamma = dot(s, y) / dot(y, y);
        for v in q.iter_mut() {
            *v *= gamma;
        }
    }
    for ((s, y, rho), alpha) in used.iter().zip(alphas.iter()).rev() {
        let beta = rho * dot(y, &q);
        for i in 0..q.len() {
            q[i] += s[i] * (alpha - beta);
        }
    }
    return q.iter().map(|v| -v).collect();
}

/// Minimizes `objective` over the box `[lower, upper]^n` with a projected
/// limited-memory BFGS method. The objective returns the value at `x` and
/// writes the gradient into its second argument. The best feasible point
/// seen is returned even when the iteration budget runs out.
pub fn find_min_box_constrained<F>(
    mut objective: F,
    start: &[f64],
    settings: &MinimizerSettings,
) -> MinimizeResult
where
    F: FnMut(&[f64], &mut [f64]) -> f64,
{
    let n = start.len();
    let lower = settings.lower;
    let upper = settings.upper;
    let mut x = start.to_vec();
    project(&mut x, lower, upper);
    let mut g = vec![0.0; n];
    let mut f = objective(&x, &mut g);
    if n == 0 || !f.is_finite() {
        return MinimizeResult {
            x,
            value: f,
            iterations: 0,
            converged: n == 0,
        };
    }

    let mut pairs: VecDeque<(Vec<f64>, Vec<f64>)> = VecDeque::with_capacity(settings.history);
    let mut trial_g = vec![0.0; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < settings.max_iterations {
        iterations += 1;
        let active = active_set(&x, &g, lower, upper);
        let mut d = search_direction(&g, &active, &pairs);
        if dot(&d, &g) >= 0.0 {
            pairs.clear();
            d = g
                .iter()
                .zip(active.iter())
                .map(|(gi, a)| if *a { 0.0 } else { -*gi })
                .collect();
        }
        let d_norm = d.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if d_norm == 0.0 {
            converged = true;
            break;
        }

        let mut step = f64::min(1.0, (upper - lower) / d_norm);
        let mut accepted = None;
        for _ in 0..MAX_BACKTRACKS {
            let mut trial: Vec<f64> = x.iter().zip(d.iter()).map(|(xi, di)| xi + step * di).collect();
            project(&mut trial, lower, upper);
            let moved: Vec<f64> = trial.iter().zip(x.iter()).map(|(a, b)| a - b).collect();
            let trial_f = objective(&trial, &mut trial_g);
            if trial_f.is_finite() && trial_f <= f + ARMIJO * dot(&g, &moved) {
                accepted = Some((trial, trial_f, moved));
                break;
            }
            step *= 0.5;
        }

        let (trial, trial_f, s) = match accepted {
            Some(a) => a,
            None => {
                // no decrease along the projected path: x is stationary to
                // the precision of the line search
                converged = true;
                break;
            }
        };
        let y: Vec<f64> = trial_g.iter().zip(g.iter()).map(|(a, b)| a - b).collect();
        if dot(&s, &y) > CURVATURE_EPSILON {
            if pairs.len() == settings.history {
                pairs.pop_front();
            }
            if settings.history > 0 {
                pairs.push_back((s, y));
            }
        }

        let change = (f - trial_f).abs();
        x = trial;
        f = trial_f;
        g.copy_from_slice(&trial_g);
        if change <= settings.tolerance * f64::max(1.0, f.abs()) {
            converged = true;
            break;
        }
    }

    if !converged {
        debug!(
            "Minimizer stopped after {} iterations at f = {}",
            iterations, f
        );
    }
    return MinimizeResult {
        x,
        value: f,
        iterations,
        converged,
    };
}
