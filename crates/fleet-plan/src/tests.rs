//! Unit tests for fleet-plan.
//!
//! Search tests use small hand-crafted maps so expected trajectories are
//! unambiguous; translation tests use the reference map for its literal
//! cell names.

#[cfg(test)]
mod helpers {
    use fleet_core::{CellId, Heading, RobotId};
    use fleet_map::{RoadMap, RoadMapBuilder};

    pub fn rid(name: &str) -> RobotId {
        RobotId::from(name)
    }

    /// Linear corridor `a → b → c → d`, bidirectional.
    pub fn corridor() -> (RoadMap, [CellId; 4]) {
        let mut b = RoadMapBuilder::new();
        for (from, to) in [("a", "b"), ("b", "c"), ("c", "d")] {
            b.edge(from, Heading::East, to);
            b.edge(to, Heading::West, from);
        }
        let map = b.build().unwrap();
        let ids = ["a", "b", "c", "d"].map(|n| map.cell(n).unwrap());
        (map, ids)
    }

    /// Direct route `s → m → g` plus a detour of `extra + 2` edges along
    /// the row below:
    ///
    /// ```text
    /// s → m → g
    /// ↓       ↑
    /// d1 → … → dn
    /// ```
    ///
    /// `extra` is how many edges longer the detour is than the direct
    /// route.
    pub fn fork(extra: usize) -> (RoadMap, CellId, CellId, CellId) {
        let mut b = RoadMapBuilder::new();
        b.edge("s", Heading::East, "m");
        b.edge("m", Heading::East, "g");
        b.edge("s", Heading::South, "d1");
        let detour_len = extra + 2; // edges on the detour route
        for i in 1..detour_len - 1 {
            b.edge(&format!("d{i}"), Heading::East, &format!("d{}", i + 1));
        }
        b.edge(&format!("d{}", detour_len - 1), Heading::North, "g");
        b.coords_root("s");
        let map = b.build().unwrap();
        let s = map.cell("s").unwrap();
        let m = map.cell("m").unwrap();
        let g = map.cell("g").unwrap();
        (map, s, m, g)
    }
}

// ── Reservation table ─────────────────────────────────────────────────────────

#[cfg(test)]
mod reservations {
    use fleet_core::Stamp;

    use crate::reservations::ReservationTable;

    use super::helpers::{corridor, rid};

    #[test]
    fn reserve_then_query() {
        let (_, [a, b, c, _]) = corridor();
        let r1 = rid("r1");
        let mut table = ReservationTable::new();
        let t0 = Stamp(100);

        table.reserve(&[a, b, c], t0, &r1);
        assert_eq!(table.len(), 3);
        assert_eq!(table.owner(b, Stamp(101)), Some(&r1));
        assert_eq!(table.owner(b, Stamp(100)), None);
    }

    #[test]
    fn can_reserve_ignores_own_entries() {
        let (_, [a, b, _, _]) = corridor();
        let (r1, r2) = (rid("r1"), rid("r2"));
        let mut table = ReservationTable::new();
        let t0 = Stamp(0);

        table.reserve(&[a, b], t0, &r1);
        // Same robot re-planning over its own slots: fine.
        assert!(table.can_reserve(&[a, b], t0, &r1));
        // Another robot colliding at (a, 0): rejected.
        assert!(!table.can_reserve(&[a], t0, &r2));
        // Another robot at a disjoint time: fine.
        assert!(table.can_reserve(&[a], Stamp(5), &r2));
    }

    #[test]
    fn duplicate_reserve_is_idempotent() {
        let (_, [a, b, _, _]) = corridor();
        let r1 = rid("r1");
        let mut table = ReservationTable::new();

        table.reserve(&[a, b], Stamp(0), &r1);
        table.reserve(&[a, b], Stamp(0), &r1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn release_owner_leaves_nothing_behind() {
        let (_, [a, b, c, d]) = corridor();
        let (r1, r2) = (rid("r1"), rid("r2"));
        let mut table = ReservationTable::new();

        table.reserve(&[a, b], Stamp(0), &r1);
        table.reserve(&[c, d], Stamp(0), &r2);
        table.release_owner(&r1);

        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|(_, owner)| *owner == r2));
    }

    #[test]
    fn release_before_collects_the_past() {
        let (_, [a, _, _, _]) = corridor();
        let r1 = rid("r1");
        let mut table = ReservationTable::new();

        for t in 0..5 {
            table.reserve(&[a], Stamp(t), &r1);
        }
        table.release_before(Stamp(3));
        // (a,3) and (a,4) survive; the boundary entry is kept.
        assert_eq!(table.len(), 2);
        assert!(table.owner(a, Stamp(3)).is_some());
        assert!(table.owner(a, Stamp(2)).is_none());
    }

    #[test]
    fn swap_owner_transfers_everything() {
        let (_, [a, b, _, _]) = corridor();
        let (r1, r2) = (rid("r1"), rid("r2"));
        let mut table = ReservationTable::new();

        table.reserve(&[a, b], Stamp(0), &r1);
        table.swap_owner(&r1, &r2);
        assert!(table.iter().all(|(_, owner)| *owner == r2));
        assert!(table.can_reserve(&[a, b], Stamp(0), &r2));
    }
}

// ── Space-time search ─────────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use std::collections::HashSet;

    use fleet_core::{PlannerConfig, Stamp};
    use fleet_map::demo_map;

    use crate::astar::{Planner, SpaceTimeAstar};
    use crate::error::PlanError;
    use crate::reservations::ReservationTable;

    use super::helpers::{corridor, fork, rid};

    fn planner() -> SpaceTimeAstar {
        SpaceTimeAstar::default()
    }

    #[test]
    fn trivial_same_cell() {
        let (map, [a, ..]) = corridor();
        let t = planner()
            .plan(&map, &ReservationTable::new(), &HashSet::new(), a, a, Stamp(0), &rid("r1"))
            .unwrap();
        assert!(t.is_trivial());
        assert_eq!(t.cells, vec![a]);
        assert_eq!(t.arrival(), Stamp(0));
    }

    #[test]
    fn straight_line() {
        let (map, [a, b, c, d]) = corridor();
        let t = planner()
            .plan(&map, &ReservationTable::new(), &HashSet::new(), a, d, Stamp(10), &rid("r1"))
            .unwrap();
        assert_eq!(t.cells, vec![a, b, c, d]);
        assert_eq!(t.arrival(), Stamp(13));
    }

    #[test]
    fn reference_map_shortest() {
        let map = demo_map();
        let c81 = map.cell("81").unwrap();
        let c71 = map.cell("71").unwrap();
        let c72 = map.cell("72").unwrap();
        let c73 = map.cell("73").unwrap();
        let t = planner()
            .plan(&map, &ReservationTable::new(), &HashSet::new(), c81, c73, Stamp(0), &rid("r1"))
            .unwrap();
        assert_eq!(t.cells, vec![c81, c71, c72, c73]);
    }

    #[test]
    fn reserved_cell_forces_a_wait() {
        let (map, [a, b, c, _]) = corridor();
        let (r1, other) = (rid("r1"), rid("r2"));
        let t0 = Stamp(100);

        // Another robot owns b exactly when we would first arrive there.
        let mut table = ReservationTable::new();
        table.reserve(&[b], t0 + 1, &other);

        let t = planner()
            .plan(&map, &table, &HashSet::new(), a, c, t0, &r1)
            .unwrap();
        assert_eq!(t.cells, vec![a, a, b, c]);
    }

    #[test]
    fn own_reservations_do_not_block() {
        let (map, [a, b, c, _]) = corridor();
        let r1 = rid("r1");
        let t0 = Stamp(100);

        let mut table = ReservationTable::new();
        table.reserve(&[a, b, c], t0, &r1);

        let t = planner()
            .plan(&map, &table, &HashSet::new(), a, c, t0, &r1)
            .unwrap();
        assert_eq!(t.cells, vec![a, b, c]);
    }

    #[test]
    fn wait_beats_a_three_longer_detour() {
        let (map, s, m, g) = fork(3);
        let mut table = ReservationTable::new();
        table.reserve(&[m], Stamp(1), &rid("other"));

        let t = planner()
            .plan(&map, &table, &HashSet::new(), s, g, Stamp(0), &rid("r1"))
            .unwrap();
        // One wait (cost 2.1) is cheaper than three extra moves (cost 3.0).
        assert_eq!(t.cells, vec![s, s, m, g]);
    }

    #[test]
    fn two_longer_detour_beats_a_wait() {
        let (map, s, m, g) = fork(2);
        let mut table = ReservationTable::new();
        table.reserve(&[m], Stamp(1), &rid("other"));

        let t = planner()
            .plan(&map, &table, &HashSet::new(), s, g, Stamp(0), &rid("r1"))
            .unwrap();
        // Two extra moves (cost 2.0) undercut one wait (cost 2.1).
        assert_eq!(t.cells.len(), 5);
        assert!(!t.cells.contains(&m));
        assert_eq!(t.cells.first(), Some(&s));
        assert_eq!(t.cells.last(), Some(&g));
    }

    #[test]
    fn idle_robot_is_a_static_blocker() {
        let (map, [a, b, _, d]) = corridor();
        let blocked: HashSet<_> = [b].into();

        let err = planner()
            .plan(&map, &ReservationTable::new(), &blocked, a, d, Stamp(0), &rid("r1"))
            .unwrap_err();
        assert!(matches!(err, PlanError::NoPath { .. }));
    }

    #[test]
    fn depth_bound_abandons_long_searches() {
        let (map, [a, _, _, d]) = corridor();
        let shallow = SpaceTimeAstar::new(&PlannerConfig {
            search_max_depth: 2,
            ..PlannerConfig::default()
        });

        // a→d needs 3 steps; with max depth 2 the search must give up.
        let err = shallow
            .plan(&map, &ReservationTable::new(), &HashSet::new(), a, d, Stamp(0), &rid("r1"))
            .unwrap_err();
        assert!(matches!(err, PlanError::NoPath { .. }));
    }

    #[test]
    fn identical_inputs_give_identical_trajectories() {
        let map = demo_map();
        let from = map.cell("51").unwrap();
        let to = map.cell("86").unwrap();
        let mut table = ReservationTable::new();
        table.reserve(&[map.cell("65").unwrap()], Stamp(3), &rid("other"));

        let a = planner()
            .plan(&map, &table, &HashSet::new(), from, to, Stamp(0), &rid("r1"))
            .unwrap();
        let b = planner()
            .plan(&map, &table, &HashSet::new(), from, to, Stamp(0), &rid("r1"))
            .unwrap();
        assert_eq!(a, b);
    }
}

// ── Command translation ───────────────────────────────────────────────────────

#[cfg(test)]
mod translate {
    use fleet_core::{Command, Heading};
    use fleet_map::demo_map;

    use crate::commands::{build_plan, translate, turn_between};

    use super::helpers::corridor;

    #[test]
    fn turn_table() {
        use Heading::*;
        assert_eq!(turn_between(South, South), Command::Straight);
        assert_eq!(turn_between(South, West), Command::Right);
        assert_eq!(turn_between(South, East), Command::Left);
        assert_eq!(turn_between(South, North), Command::UTurn);
    }

    #[test]
    fn reference_path_from_south() {
        // 81→71 is the n edge: U-turn from south.  71→72 east: right from
        // north.  72→73 east: straight.
        let map = demo_map();
        let path: Vec<_> = ["81", "71", "72", "73"]
            .iter()
            .map(|n| map.cell(n).unwrap())
            .collect();

        let (commands, heading) = translate(&map, &path, Heading::South);
        assert_eq!(commands, vec![Command::UTurn, Command::Right, Command::Straight]);
        assert_eq!(heading, Heading::East);

        let plan = build_plan(&path, &commands);
        let rendered: Vec<(&str, char)> = plan
            .iter()
            .map(|s| (map.name(s.cell), s.command.token()))
            .collect();
        assert_eq!(
            rendered,
            vec![("81", 'U'), ("71", 'R'), ("72", 'S'), ("73", 'D')]
        );
    }

    #[test]
    fn single_cell_path_is_done_only() {
        let (map, [a, ..]) = corridor();
        let (commands, heading) = translate(&map, &[a], Heading::West);
        assert!(commands.is_empty());
        assert_eq!(heading, Heading::West);

        let plan = build_plan(&[a], &commands);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].cell, a);
        assert_eq!(plan[0].command, Command::Done);
    }

    #[test]
    fn wait_step_goes_straight_without_rotating() {
        let (map, [a, b, ..]) = corridor();
        let (commands, heading) = translate(&map, &[a, a, b], Heading::North);
        // Wait: straight, still facing north.  a→b east: right turn.
        assert_eq!(commands, vec![Command::Straight, Command::Right]);
        assert_eq!(heading, Heading::East);
    }

    #[test]
    fn declared_final_heading_matches_replay() {
        let map = demo_map();
        let path: Vec<_> = ["51", "52", "53", "63", "73", "83"]
            .iter()
            .map(|n| map.cell(n).unwrap())
            .collect();

        for start in Heading::ALL {
            let (commands, declared) = translate(&map, &path, start);
            let replayed = commands.iter().fold(start, |h, c| c.apply(h));
            assert_eq!(declared, replayed);
        }
    }
}
