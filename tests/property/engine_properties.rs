use std::collections::HashSet;

use fieldops_engine::assign::{AssignOptions, AssignmentMethod, assign};
use fieldops_engine::budget::{BudgetOptions, allocate};
use fieldops_engine::geo::GeoPoint;
use fieldops_engine::optimize::SolveLimits;
use fieldops_engine::route::sequence;
use fieldops_engine::traits::{Agent, Category, Stop};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Site {
    id: usize,
    position: GeoPoint,
}

impl Agent for Site {
    type Id = usize;

    fn id(&self) -> &usize {
        &self.id
    }

    fn position(&self) -> GeoPoint {
        self.position
    }
}

impl Stop for Site {
    type Id = usize;

    fn id(&self) -> &usize {
        &self.id
    }

    fn position(&self) -> GeoPoint {
        self.position
    }
}

#[derive(Debug, Clone)]
struct Line {
    id: usize,
    rate: f64,
    risk: f64,
}

impl Category for Line {
    type Id = usize;

    fn id(&self) -> &usize {
        &self.id
    }

    fn return_rate(&self) -> f64 {
        self.rate
    }

    fn risk_weight(&self) -> f64 {
        self.risk
    }
}

/// A point around Bengaluru, missing its coordinates about one time in six.
fn point() -> impl Strategy<Value = GeoPoint> {
    prop_oneof![
        5 => (12.8f64..13.2, 77.4f64..77.8).prop_map(|(lat, lng)| GeoPoint::new(lat, lng)),
        1 => Just(GeoPoint::unknown()),
    ]
}

fn sites(range: std::ops::Range<usize>) -> impl Strategy<Value = Vec<Site>> {
    prop::collection::vec(point(), range).prop_map(|points| {
        points
            .into_iter()
            .enumerate()
            .map(|(id, position)| Site { id, position })
            .collect()
    })
}

proptest! {
    #[test]
    fn sequence_is_a_permutation(start in point(), stops in sites(0..30)) {
        let route = sequence(start, &stops);
        prop_assert_eq!(route.len(), stops.len());

        let mut ids: Vec<usize> = route.iter().map(|site| site.id).collect();
        ids.sort();
        prop_assert_eq!(ids, (0..stops.len()).collect::<Vec<_>>());
    }

    #[test]
    fn sequence_puts_unlocated_stops_last(start in point(), stops in sites(0..30)) {
        let route = sequence(start, &stops);
        if start.is_known() {
            let first_unknown = route.iter().position(|site| !site.position.is_known()).unwrap_or(route.len());
            prop_assert!(route[first_unknown..].iter().all(|site| !site.position.is_known()));
        }
    }

    #[test]
    fn assignment_partitions_stops(
        agents in sites(1..5),
        stops in sites(1..25),
        capacity in 0usize..10,
    ) {
        let result = assign(&agents, &stops, capacity, &AssignOptions::default()).unwrap();

        prop_assert_eq!(result.method, AssignmentMethod::Optimal);
        prop_assert_eq!(result.groups.len(), agents.len());
        prop_assert_eq!(result.assigned_count(), stops.len());

        let mut seen = HashSet::new();
        for group in &result.groups {
            prop_assert!(group.count() <= result.capacity);
            for id in &group.stop_ids {
                prop_assert!(seen.insert(*id), "stop {} assigned twice", id);
            }
        }
        prop_assert_eq!(seen.len(), stops.len());
    }

    #[test]
    fn optimal_beats_round_robin(
        agents in sites(1..5),
        stops in sites(1..25),
        capacity in 0usize..10,
    ) {
        let optimal = assign(&agents, &stops, capacity, &AssignOptions::default()).unwrap();
        let fallback_options = AssignOptions {
            limits: SolveLimits::unlimited().with_max_iterations(0),
            ..AssignOptions::default()
        };
        let fallback = assign(&agents, &stops, capacity, &fallback_options).unwrap();

        prop_assert_eq!(fallback.method, AssignmentMethod::RoundRobin);
        prop_assert!(optimal.total_distance_km <= fallback.total_distance_km + 1e-6);
    }

    #[test]
    fn allocation_respects_limits(
        fund in 0.0f64..1e7,
        lines in prop::collection::vec((0.0f64..30.0, 0.0f64..=1.0), 1..12),
    ) {
        let categories: Vec<Line> = lines
            .into_iter()
            .enumerate()
            .map(|(id, (rate, risk))| Line { id, rate, risk })
            .collect();

        let allocation = allocate(fund, &categories, &BudgetOptions::default()).unwrap();

        prop_assert_eq!(allocation.amounts.len(), categories.len());
        prop_assert!(allocation.total() <= fund * (1.0 + 1e-12) + 1e-6);
        for entry in &allocation.amounts {
            prop_assert!(entry.amount >= 0.0);
            prop_assert!(entry.amount <= fund * 0.5 + 1e-6);
        }
    }
}
