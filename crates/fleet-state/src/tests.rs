//! Unit tests for fleet-state.

#[cfg(test)]
mod helpers {
    use fleet_core::{CellId, Heading, RobotId, Stamp};
    use fleet_map::{demo_map, RoadMap};

    use crate::store::FleetStore;

    pub fn setup() -> (RoadMap, FleetStore) {
        (demo_map(), FleetStore::new())
    }

    pub fn park(store: &mut FleetStore, map: &RoadMap, id: &str, cell: &str) -> (RobotId, CellId) {
        let cell = map.cell(cell).unwrap();
        let (rid, _, _) =
            store.register_robot(Some(RobotId::from(id)), cell, Heading::South, Stamp(0));
        (rid, cell)
    }
}

// ── Registration ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod registration {
    use fleet_core::{Heading, JobId, RobotId, Stamp};

    use crate::robot::RobotStatus;

    use super::helpers::{park, setup};

    #[test]
    fn creates_idle_robot_with_color() {
        let (map, mut store) = setup();
        let (rid, _) = park(&mut store, &map, "r1", "81");
        let robot = store.robot(&rid).unwrap();
        assert_eq!(robot.status, RobotStatus::Idle);
        assert!(robot.color.starts_with('#'));
        assert!(robot.job.is_none());
    }

    #[test]
    fn generates_id_when_absent() {
        let (map, mut store) = setup();
        let cell = map.cell("82").unwrap();
        let (rid, _, _) = store.register_robot(None, cell, Heading::South, Stamp(0));
        assert_eq!(rid.as_str().len(), 6);
        assert!(store.robot(&rid).is_ok());
    }

    #[test]
    fn refresh_keeps_color_and_reports_previous_job() {
        let (map, mut store) = setup();
        let (rid, cell81) = park(&mut store, &map, "r1", "81");
        let color = store.robot(&rid).unwrap().color.clone();

        // Hand the robot a job, then re-register it elsewhere.
        let jid = store.create_system_job(cell81, map.cell("71").unwrap(), rid.clone(), Stamp(1));
        {
            let robot = store.robot_mut(&rid).unwrap();
            robot.status = RobotStatus::Busy;
            robot.job = Some(jid.clone());
        }

        let cell71 = map.cell("71").unwrap();
        let (rid2, color2, previous) =
            store.register_robot(Some(rid.clone()), cell71, Heading::North, Stamp(5));
        assert_eq!(rid2, rid);
        assert_eq!(color2, color);
        assert_eq!(previous, Some(jid));

        let robot = store.robot(&rid).unwrap();
        assert_eq!(robot.status, RobotStatus::Idle);
        assert_eq!(robot.cell, cell71);
        assert_eq!(robot.last_seen, Stamp(5));
    }

    #[test]
    fn unknown_ids_fail_lookup() {
        let (_, mut store) = setup();
        assert!(store.robot(&RobotId::from("ghost")).is_err());
        assert!(store.robot_mut(&RobotId::from("ghost")).is_err());
        assert!(store.job(&JobId::from("ghost")).is_err());
    }
}

// ── Queue discipline ──────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use fleet_core::Stamp;

    use crate::job::JobStatus;

    use super::helpers::setup;

    #[test]
    fn submission_order_is_preserved() {
        let (map, mut store) = setup();
        let p = map.cell("71").unwrap();
        let d = map.cell("63").unwrap();
        let j1 = store.submit_job(p, d, Stamp(1));
        let j2 = store.submit_job(d, p, Stamp(2));
        assert_eq!(store.queued_job_ids(), vec![j1.clone(), j2.clone()]);

        store.remove_from_queue(&j1);
        assert_eq!(store.queued_job_ids(), vec![j2]);
    }

    #[test]
    fn non_queued_jobs_are_filtered_from_snapshots() {
        let (map, mut store) = setup();
        let p = map.cell("71").unwrap();
        let d = map.cell("63").unwrap();
        let j1 = store.submit_job(p, d, Stamp(1));
        store.job_mut(&j1).unwrap().status = JobStatus::Failed;
        assert!(store.queued_job_ids().is_empty());
    }

    #[test]
    fn system_jobs_skip_the_queue() {
        let (map, mut store) = setup();
        let p = map.cell("33").unwrap();
        let d = map.cell("31").unwrap();
        let jid = store.create_system_job(p, d, "r1".into(), Stamp(1));
        assert_eq!(store.job(&jid).unwrap().status, JobStatus::Assigned);
        assert_eq!(store.queue_len(), 0);
    }
}

// ── Parking and blockers ──────────────────────────────────────────────────────

#[cfg(test)]
mod parking {
    use crate::robot::RobotStatus;

    use super::helpers::{park, setup};

    #[test]
    fn nearest_free_parking_ties_break_by_name() {
        let (map, store) = setup();
        // From 33, parking cells 13 and 31 are both at distance 2; the
        // lexicographically smaller name wins.
        let from = map.cell("33").unwrap();
        let spot = store.nearest_free_parking(&map, from).unwrap();
        assert_eq!(map.name(spot), "13");
    }

    #[test]
    fn occupied_bays_are_skipped() {
        let (map, mut store) = setup();
        park(&mut store, &map, "squatter", "13");
        let from = map.cell("33").unwrap();
        let spot = store.nearest_free_parking(&map, from).unwrap();
        assert_eq!(map.name(spot), "31");
    }

    #[test]
    fn busy_robots_do_not_occupy_bays() {
        let (map, mut store) = setup();
        let (rid, _) = park(&mut store, &map, "r1", "13");
        store.robot_mut(&rid).unwrap().status = RobotStatus::Busy;
        let from = map.cell("33").unwrap();
        let spot = store.nearest_free_parking(&map, from).unwrap();
        assert_eq!(map.name(spot), "13");
    }

    #[test]
    fn static_blockers_exclude_self_and_busy() {
        let (map, mut store) = setup();
        let (r1, c81) = park(&mut store, &map, "r1", "81");
        let (_r2, c82) = park(&mut store, &map, "r2", "82");
        let (r3, _) = park(&mut store, &map, "r3", "83");
        store.robot_mut(&r3).unwrap().status = RobotStatus::Busy;

        let blockers = store.static_blockers(&r1);
        assert!(!blockers.contains(&c81), "own cell never blocks");
        assert!(blockers.contains(&c82));
        assert_eq!(blockers.len(), 1, "busy robots are not static blockers");
    }

    #[test]
    fn no_free_bay_yields_none() {
        let (map, mut store) = setup();
        for (i, name) in [
            "81", "82", "83", "84", "85", "86", "11", "12", "13", "15", "26", "31", "46", "51",
            "56",
        ]
        .iter()
        .enumerate()
        {
            park(&mut store, &map, &format!("r{i}"), name);
        }
        let from = map.cell("33").unwrap();
        assert!(store.nearest_free_parking(&map, from).is_none());
    }
}

// ── Reset ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reset {
    use fleet_core::Stamp;

    use crate::job::JobStatus;
    use crate::robot::RobotStatus;

    use super::helpers::{park, setup};

    #[test]
    fn fails_assigned_jobs_and_idles_robots() {
        let (map, mut store) = setup();
        let (rid, c81) = park(&mut store, &map, "r1", "81");
        let c71 = map.cell("71").unwrap();

        let queued = store.submit_job(c71, c81, Stamp(1));
        let assigned = store.create_system_job(c81, c71, rid.clone(), Stamp(1));
        {
            let robot = store.robot_mut(&rid).unwrap();
            robot.status = RobotStatus::Busy;
            robot.job = Some(assigned.clone());
            robot.path = vec![c81, c71];
        }
        store.reservations.reserve(&[c81, c71], Stamp(1), &rid);

        let failed = store.reset();
        assert_eq!(failed, vec![assigned.clone()]);
        assert_eq!(store.job(&assigned).unwrap().status, JobStatus::Failed);
        // Never-assigned jobs keep their status; the queue itself is gone.
        assert_eq!(store.job(&queued).unwrap().status, JobStatus::Queued);
        assert_eq!(store.queue_len(), 0);
        assert!(store.reservations.is_empty());

        let robot = store.robot(&rid).unwrap();
        assert_eq!(robot.status, RobotStatus::Idle);
        assert!(robot.job.is_none());
        assert!(robot.path.is_empty());
    }
}

// ── Wire views ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod views {
    use fleet_core::{Command, Stamp};
    use fleet_plan::PlanStep;

    use crate::view::{job_view, robot_view};

    use super::helpers::{park, setup};

    #[test]
    fn robot_view_uses_protocol_field_names() {
        let (map, mut store) = setup();
        let (rid, _) = park(&mut store, &map, "r1", "81");
        let view = robot_view(&map, store.robot(&rid).unwrap());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["node"], "81");
        assert_eq!(json["dir"], "s");
        assert_eq!(json["status"], "idle");
        assert!(json["current_path"].as_array().unwrap().is_empty());
        assert!(json.get("current_job").is_none());
    }

    #[test]
    fn job_view_renders_plan_tuples_and_plan_str() {
        let (map, mut store) = setup();
        let c81 = map.cell("81").unwrap();
        let c71 = map.cell("71").unwrap();
        let jid = store.create_system_job(c81, c71, "r1".into(), Stamp(9));
        {
            let job = store.job_mut(&jid).unwrap();
            job.path = vec![c81, c71];
            job.plan = vec![
                PlanStep { cell: c81, command: Command::Straight },
                PlanStep { cell: c71, command: Command::Done },
            ];
        }

        let view = job_view(&map, store.job(&jid).unwrap());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["pickup"], "81");
        assert_eq!(json["drop"], "71");
        assert_eq!(json["status"], "assigned");
        assert_eq!(json["assigned_robot"], "r1");
        assert_eq!(json["submitted_ts"], 9);
        assert_eq!(json["path"][0], "81");
        assert_eq!(json["plan"][0][0], "81");
        assert_eq!(json["plan"][0][1], "S");
        assert_eq!(json["plan"][1][1], "D");
        assert_eq!(json["plan_str"], "81 S 71 D");
        assert!(json["progress_index"].is_null());
    }

    #[test]
    fn queued_job_view_omits_plan_fields() {
        let (map, mut store) = setup();
        let c81 = map.cell("81").unwrap();
        let c71 = map.cell("71").unwrap();
        let jid = store.submit_job(c71, c81, Stamp(3));
        let json = serde_json::to_value(job_view(&map, store.job(&jid).unwrap())).unwrap();

        assert_eq!(json["status"], "queued");
        assert!(json.get("path").is_none());
        assert!(json.get("plan").is_none());
        assert!(json.get("plan_str").is_none());
        assert!(json["assigned_robot"].is_null());
    }
}
