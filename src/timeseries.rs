//! Trial averaging of fMRI time courses against an experimental design.
//!
//! A design lists intervals of (condition, onset, duration). For each
//! selected condition the voxel time course is sampled at trial-aligned
//! time points by linear interpolation over the frame grid, and the mean
//! and spread across trials is computed for the conditional-average plot.
use ndarray::ArrayView1;

/// One row of an experimental design: a condition shown over an interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignInterval {
    /// Numeric label of the experimental condition.
    pub condition: i32,
    /// Onset time in seconds.
    pub onset: f32,
    /// Duration in seconds.
    pub duration: f32,
}

/// The distinct condition labels of a design, in ascending order.
pub fn conditions(design: &[DesignInterval]) -> Vec<i32> {
    let mut conds: Vec<i32> = design.iter().map(|row| row.condition).collect();
    conds.sort_unstable();
    conds.dedup();
    conds
}

/// The average time course of one condition over its trials.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialAverage {
    /// Condition label.
    pub condition: i32,
    /// Time points relative to trial onset.
    pub times: Vec<f32>,
    /// Mean intensity across trials, per time point.
    pub mean: Vec<f32>,
    /// Spread term across trials (population std over trial count).
    pub stderr: Vec<f32>,
}

/// Linear interpolation over a sample grid, clamped at both ends.
fn interp(x: f32, xp: &[f32], fp: ArrayView1<f32>) -> f32 {
    if x <= xp[0] {
        return fp[0];
    }
    let last = xp.len() - 1;
    if x >= xp[last] {
        return fp[last];
    }
    for i in 0..last {
        if x <= xp[i + 1] {
            let width = xp[i + 1] - xp[i];
            if width == 0.0 {
                return fp[i + 1];
            }
            let t = (x - xp[i]) / width;
            return fp[i] + (fp[i + 1] - fp[i]) * t;
        }
    }
    fp[last]
}

fn linspace(start: f32, end: f32, count: usize) -> Vec<f32> {
    if count == 1 {
        return vec![start];
    }
    let step = (end - start) / (count - 1) as f32;
    (0..count).map(|i| start + i as f32 * step).collect()
}

/// Average a voxel time course over the trials of each selected condition.
///
/// `window` is the trial duration to average over and `dx` the sampling
/// step within a trial; `floor(window / dx)` points are produced per
/// trial. Frames are assumed `frame_time` seconds apart. Conditions not
/// present in the design, and conditions with no trials, are skipped.
pub fn trial_averages(
    course: ArrayView1<f32>,
    frame_time: f32,
    design: &[DesignInterval],
    selected: &[i32],
    window: f32,
    dx: f32,
) -> Vec<TrialAverage> {
    let num_pts = (window / dx).floor() as usize;
    if num_pts == 0 || course.is_empty() {
        return Vec::new();
    }
    let trial_times = linspace(0.0, num_pts as f32 * dx, num_pts);
    let frame_times = linspace(0.0, (course.len() - 1) as f32 * frame_time, course.len());
    let known = conditions(design);

    let mut averages = Vec::new();
    for &condition in selected {
        if !known.contains(&condition) {
            continue;
        }
        let onsets: Vec<f32> = design
            .iter()
            .filter(|row| row.condition == condition)
            .map(|row| row.onset)
            .collect();
        let trials = onsets.len();
        if trials == 0 {
            continue;
        }

        let mut mean = vec![0.0f32; num_pts];
        let mut samples = vec![vec![0.0f32; trials]; num_pts];
        for (t, &onset) in onsets.iter().enumerate() {
            for (p, &offset) in trial_times.iter().enumerate() {
                let value = interp(onset + offset, &frame_times, course);
                samples[p][t] = value;
                mean[p] += value;
            }
        }
        for m in &mut mean {
            *m /= trials as f32;
        }
        let stderr = samples
            .iter()
            .zip(&mean)
            .map(|(row, m)| {
                let variance =
                    row.iter().map(|v| (v - m) * (v - m)).sum::<f32>() / trials as f32;
                variance.sqrt() / trials as f32
            })
            .collect();

        averages.push(TrialAverage {
            condition,
            times: trial_times.clone(),
            mean,
            stderr,
        });
    }
    averages
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    #[test]
    fn interp_clamps_at_the_ends() {
        let course = Array1::from(vec![1.0f32, 3.0, 5.0]);
        let grid = [0.0, 1.0, 2.0];
        assert_eq!(interp(-1.0, &grid, course.view()), 1.0);
        assert_eq!(interp(0.5, &grid, course.view()), 2.0);
        assert_eq!(interp(9.0, &grid, course.view()), 5.0);
    }

    #[test]
    fn unknown_conditions_are_skipped() {
        let course = Array1::from(vec![0.0f32; 10]);
        let design = [DesignInterval {
            condition: 1,
            onset: 0.0,
            duration: 2.0,
        }];
        let averages = trial_averages(course.view(), 1.0, &design, &[1, 7], 4.0, 1.0);
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].condition, 1);
    }

    #[test]
    fn averages_identical_trials_without_spread() {
        // a course that repeats every 4 frames, with trials aligned to it
        let course = Array1::from(vec![0.0f32, 2.0, 4.0, 0.0, 0.0, 2.0, 4.0, 0.0]);
        let design = [
            DesignInterval {
                condition: 2,
                onset: 0.0,
                duration: 3.0,
            },
            DesignInterval {
                condition: 2,
                onset: 4.0,
                duration: 3.0,
            },
        ];
        let averages = trial_averages(course.view(), 1.0, &design, &[2], 3.0, 1.0);
        assert_eq!(averages.len(), 1);
        let avg = &averages[0];
        assert_eq!(avg.times.len(), 3);
        assert_relative_eq!(avg.mean[0], 0.0);
        assert_relative_eq!(avg.mean[1], 3.0);
        assert!(avg.stderr.iter().all(|&s| s == 0.0));
    }
}
