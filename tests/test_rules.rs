use std::time::Duration;

use car_dodge::rules::*;

#[test]
fn start_position_inside_bounds() {
    for ruleset in Ruleset::ALL {
        let r = ruleset.rules();
        let (x, y) = r.player_start;
        assert!((r.x_min..=r.x_max).contains(&x), "{ruleset}");
        assert!((r.y_min..=r.y_max).contains(&y), "{ruleset}");
        assert!(r.x_max + r.player_width <= r.field_width);
        assert!(r.y_max + r.player_height <= r.field_height);
    }
}

#[test]
fn lanes_fit_in_field() {
    for ruleset in Ruleset::ALL {
        let r = ruleset.rules();
        assert!(!r.lanes.is_empty());
        assert!(r
            .lanes
            .iter()
            .all(|&x| x >= 0 && x + r.obstacle_width <= r.field_width));
    }
}

#[test]
fn spawn_chance_is_clamped() {
    let r = Ruleset::Classic.rules();
    assert!((r.obstacle_spawn_chance(0) - 0.008).abs() < 1e-9);
    assert_eq!(r.obstacle_spawn_chance(100), 1.0);
}

#[test]
fn lanes_spawn_chance_grows_slowly() {
    let r = Ruleset::Lanes.rules();
    assert!((r.obstacle_spawn_chance(0) - 0.02).abs() < 1e-9);
    assert!((r.obstacle_spawn_chance(10) - 0.04).abs() < 1e-9);
}

#[test]
fn speed_grows_one_per_level() {
    let r = Ruleset::Lanes.rules();
    assert_eq!(r.speed_for(1), 5);
    assert_eq!(r.speed_for(4), 8);
    assert_eq!(Ruleset::Classic.rules().speed_for(1), 4);
}

#[test]
fn only_classic_is_horizontal_only() {
    assert!(!Ruleset::Classic.rules().allows_vertical());
    assert!(Ruleset::Lanes.rules().allows_vertical());
    assert!(Ruleset::Shield.rules().allows_vertical());
}

#[test]
fn only_shield_has_power_ups() {
    assert!(Ruleset::Classic.rules().power_up.is_none());
    assert!(Ruleset::Lanes.rules().power_up.is_none());
    let p = Ruleset::Shield.rules().power_up.unwrap();
    assert_eq!(p.shield_duration, Duration::from_secs(5));
    assert!(p.width < Ruleset::Shield.rules().obstacle_width);
}

#[test]
fn parse_ruleset_names() {
    assert_eq!("Classic".parse::<Ruleset>(), Ok(Ruleset::Classic));
    assert_eq!("2".parse::<Ruleset>(), Ok(Ruleset::Lanes));
    assert_eq!("shield".parse::<Ruleset>(), Ok(Ruleset::Shield));
    assert!("turbo".parse::<Ruleset>().is_err());
}

#[test]
fn display_matches_parse() {
    for ruleset in Ruleset::ALL {
        assert_eq!(ruleset.to_string().parse::<Ruleset>(), Ok(ruleset));
    }
}
