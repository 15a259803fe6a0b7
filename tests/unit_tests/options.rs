use ice_fve::error::ConfigError;
use ice_fve::options::Options;

#[test]
fn negative_numbers_are_values() {
    let options = Options::from_args(["-cmb_ela", "-100.5", "-ice_delta", "-1e-3"]);
    assert_eq!(options.real("cmb_ela", 0.0), Ok(-100.5));
    assert_eq!(options.real("ice_delta", 0.0), Ok(-1e-3));
}

#[test]
fn flags_and_explicit_booleans() {
    let options = Options::from_args(["-dnl_dump", "-dnl_check_admissible", "false", "-a_flag", "on"]);
    assert_eq!(options.boolean("dnl_dump", false), Ok(true));
    assert_eq!(options.boolean("dnl_check_admissible", true), Ok(false));
    assert_eq!(options.boolean("a_flag", false), Ok(true));
    assert_eq!(options.boolean("missing", true), Ok(true));
}

#[test]
fn last_occurrence_wins_and_strays_are_ignored() {
    let options = Options::from_args(["stray", "-da_grid_x", "5", "extra", "-da_grid_x", "9"]);
    assert_eq!(options.integer("da_grid_x", 2), Ok(9));
    assert!(options.has("da_grid_x"));
    assert!(!options.has("stray"));
}

#[test]
fn malformed_values_are_reported() {
    let options = Options::from_args(["-ice_n", "three", "-da_refine", "-1", "-ice_A"]);
    assert_eq!(
        options.real("ice_n", 3.0),
        Err(ConfigError::MalformedOption {
            option: "ice_n".to_string(),
            value: "three".to_string()
        })
    );
    assert!(options.integer("da_refine", 0).is_err());
    // A real option without a value
    assert!(options.real("ice_A", 1.0).is_err());
}

#[test]
fn choices_are_case_insensitive() {
    let mut options = Options::new();
    options.set("dnl_problem", "ICE");
    let choices = [("obstacle", 0), ("ice", 1)];
    assert_eq!(options.choice("dnl_problem", &choices, 0), Ok(1));
    assert_eq!(options.choice("dnl_other", &choices, 0), Ok(0));
}
