// src/reader/time.rs
use crate::error::{ReaderError, Result};
use crate::metadata::{GlobalStep, TimeIndex};
use crate::types::{TimeRequest, Warning};

/// The step(s) a request maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub first: GlobalStep,
    /// The upper bracketing step, only when interpolating between two steps.
    pub second: Option<GlobalStep>,
    /// Target time for interpolation: the requested time, or the time of `first`.
    pub time: Option<f64>,
    /// Set when the request was out of range and clamped.
    pub warning: Option<Warning>,
}

impl Resolution {
    fn single(step: &GlobalStep, warning: Option<Warning>) -> Self {
        Resolution {
            first: step.clone(),
            second: None,
            time: step.time,
            warning,
        }
    }

    pub fn is_bracketed(&self) -> bool {
        self.second.is_some()
    }
}

/// Map `request` onto `steps`, using `index` (built from the same steps) for time lookups.
///
/// Time requests: out of range falls back to the last step; an exact match
/// wins even when interpolating; otherwise the rightmost step at or below the
/// time is used, paired with its successor if `interpolate` is set. A time
/// request costs one bisection. Step requests never interpolate and are
/// clamped into range.
pub fn resolve_time(
    request: TimeRequest,
    interpolate: bool,
    steps: &[GlobalStep],
    index: &TimeIndex,
) -> Result<Resolution> {
    let last = steps.last().ok_or(ReaderError::EmptyTimeAxis)?;

    match request {
        TimeRequest::Time(time) => {
            let (min, max) = index.range().ok_or(ReaderError::NoTimeInformation)?;
            if !(min..=max).contains(&time) {
                let warning = Warning::TimeOutOfRange { requested: time, min, max };
                return Ok(Resolution::single(last, Some(warning)));
            }

            // time <= max, so `upper` is in bounds.
            let upper = index.lower_bound(time);
            let upper_step = &steps[index.position(upper)];
            if index.time(upper) == time {
                return Ok(Resolution::single(upper_step, None));
            }

            // min < time here, so upper >= 1.
            let first = &steps[index.position(upper - 1)];
            Ok(Resolution {
                first: first.clone(),
                second: interpolate.then(|| upper_step.clone()),
                time: Some(time),
                warning: None,
            })
        }
        TimeRequest::Step(step) => {
            let n = steps.len() - 1;
            let (idx, warning) = if step == -1 {
                (n, None)
            } else if step < 0 {
                (0, Some(Warning::StepOutOfRange { requested: step, last: n }))
            } else if step as u64 > n as u64 {
                (n, Some(Warning::StepOutOfRange { requested: step, last: n }))
            } else {
                (step as usize, None)
            };
            Ok(Resolution::single(&steps[idx], warning))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{build_global_steps, record_for_tests};
    use proptest::prelude::*;

    fn resolve(request: TimeRequest, interpolate: bool, steps: &[GlobalStep]) -> Result<Resolution> {
        resolve_time(request, interpolate, steps, &TimeIndex::new(steps))
    }

    fn family() -> Vec<GlobalStep> {
        build_global_steps(&[
            record_for_tests("run.e", &[Some(0.0), Some(1.0), Some(2.0)]),
            record_for_tests("run.e-s002", &[Some(2.0), Some(3.0)]),
        ])
    }

    #[test]
    fn test_empty_axis_is_an_error() {
        assert!(matches!(
            resolve(TimeRequest::LATEST, true, &[]),
            Err(ReaderError::EmptyTimeAxis)
        ));
    }

    #[test]
    fn test_latest_step_by_default() {
        let r = resolve(TimeRequest::default(), true, &family()).unwrap();
        assert_eq!(r.first.step, 4);
        assert!(r.second.is_none());
        assert!(r.warning.is_none());
    }

    #[test]
    fn test_step_in_range() {
        let r = resolve(TimeRequest::Step(2), true, &family()).unwrap();
        assert_eq!(r.first.step, 2);
        assert_eq!(r.time, Some(2.0));
        assert!(r.warning.is_none());
    }

    #[test]
    fn test_step_out_of_range_clamps() {
        let r = resolve(TimeRequest::Step(-5), true, &family()).unwrap();
        assert_eq!(r.first.step, 0);
        assert_eq!(r.warning, Some(Warning::StepOutOfRange { requested: -5, last: 4 }));

        let r = resolve(TimeRequest::Step(42), true, &family()).unwrap();
        assert_eq!(r.first.step, 4);
        assert!(r.warning.is_some());
    }

    #[test]
    fn test_time_above_range_uses_last_step() {
        let r = resolve(TimeRequest::Time(10.0), true, &family()).unwrap();
        assert_eq!(r.first.step, 4);
        assert!(r.second.is_none());
        assert_eq!(
            r.warning,
            Some(Warning::TimeOutOfRange {
                requested: 10.0,
                min: 0.0,
                max: 3.0
            })
        );
    }

    #[test]
    fn test_time_below_range_uses_last_step() {
        let r = resolve(TimeRequest::Time(-1.0), false, &family()).unwrap();
        assert_eq!(r.first.step, 4);
        assert!(r.warning.is_some());
    }

    #[test]
    fn test_exact_match_skips_interpolation() {
        let r = resolve(TimeRequest::Time(1.0), true, &family()).unwrap();
        assert_eq!(r.first.step, 1);
        assert!(r.second.is_none());

        // A time repeated across files resolves to its first occurrence.
        let r = resolve(TimeRequest::Time(2.0), true, &family()).unwrap();
        assert_eq!(r.first.step, 2);
        assert!(r.second.is_none());
    }

    #[test]
    fn test_bracketing_pair() {
        let r = resolve(TimeRequest::Time(2.5), true, &family()).unwrap();
        assert_eq!(r.first.step, 3);
        assert_eq!(r.first.local, 0);
        assert_eq!(r.second.as_ref().unwrap().step, 4);
        assert_eq!(r.time, Some(2.5));

        let r = resolve(TimeRequest::Time(0.5), false, &family()).unwrap();
        assert_eq!(r.first.step, 0);
        assert!(r.second.is_none());
    }

    #[test]
    fn test_time_request_without_times() {
        let steps = build_global_steps(&[record_for_tests("mesh.e", &[None])]);
        assert!(matches!(
            resolve(TimeRequest::Time(1.0), true, &steps),
            Err(ReaderError::NoTimeInformation)
        ));
        assert_eq!(resolve(TimeRequest::LATEST, true, &steps).unwrap().first.step, 0);
    }

    #[test]
    fn test_nan_time_is_out_of_range() {
        let r = resolve(TimeRequest::Time(f64::NAN), true, &family()).unwrap();
        assert_eq!(r.first.step, 4);
        assert!(r.warning.is_some());
    }

    proptest! {
        #[test]
        fn prop_bracket_contains_time(
            mut times in prop::collection::vec(0.0f64..1000.0, 2..64),
            frac in 0.0f64..1.0,
        ) {
            times.sort_by(|a, b| a.partial_cmp(b).unwrap());
            times.dedup();
            prop_assume!(times.len() >= 2);

            let with_time: Vec<Option<f64>> = times.iter().copied().map(Some).collect();
            let steps = build_global_steps(&[record_for_tests("run.e", &with_time)]);
            let t = (times[0] + frac * (times[times.len() - 1] - times[0])).min(times[times.len() - 1]);

            let r = resolve(TimeRequest::Time(t), true, &steps).unwrap();
            prop_assert!(r.warning.is_none());
            let t0 = r.first.time.unwrap();
            match &r.second {
                None => prop_assert_eq!(t0, t),
                Some(second) => {
                    let t1 = second.time.unwrap();
                    prop_assert!(t0 < t && t < t1);
                    prop_assert_eq!(second.step, r.first.step + 1);
                }
            }
        }

        #[test]
        fn prop_bisection_agrees_with_scan(
            mut times in prop::collection::vec(0u8..20, 1..48),
            target in 0u8..20,
            interpolate in any::<bool>(),
        ) {
            // Small integer times give plenty of repeats and exact hits.
            times.sort();
            let with_time: Vec<Option<f64>> = times.iter().map(|&t| Some(t as f64)).collect();
            let steps = build_global_steps(&[record_for_tests("run.e", &with_time)]);
            let t = target as f64;

            let r = resolve(TimeRequest::Time(t), interpolate, &steps).unwrap();
            let (min, max) = (with_time[0].unwrap(), with_time[with_time.len() - 1].unwrap());
            if t < min || t > max {
                prop_assert_eq!(r.first.step, steps.len() - 1);
            } else if let Some(exact) = steps.iter().position(|s| s.time == Some(t)) {
                prop_assert_eq!(r.first.step, exact);
                prop_assert!(r.second.is_none());
            } else {
                let below = steps.iter().rposition(|s| s.time.unwrap() <= t).unwrap();
                prop_assert_eq!(r.first.step, below);
                prop_assert_eq!(r.second.map(|s| s.step), interpolate.then_some(below + 1));
            }
        }

        #[test]
        fn prop_step_always_resolves_in_bounds(len in 1usize..32, step in -100i64..100) {
            let times: Vec<Option<f64>> = (0..len).map(|i| Some(i as f64)).collect();
            let steps = build_global_steps(&[record_for_tests("run.e", &times)]);
            let r = resolve(TimeRequest::Step(step), true, &steps).unwrap();
            prop_assert!(r.first.step < len);
            prop_assert!(r.second.is_none());
            let in_range = step == -1 || (0..len as i64).contains(&step);
            prop_assert_eq!(r.warning.is_none(), in_range);
        }
    }
}
