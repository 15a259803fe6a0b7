use ice_fve::cmb::SECONDS_PER_YEAR;
use ice_fve::config::{BedKind, CmbParameters, DnlParameters, GridParameters, IceParameters, ProblemKind};
use ice_fve::error::ConfigError;
use ice_fve::grid::BoundaryType;
use ice_fve::options::Options;
use ice_fve::problem::{FveModel, SourceTerm};
use ice_fve::profiles::{BedProfile, ObstacleProfile};
use matrixcompare::assert_scalar_eq;

#[test]
fn glen_exponent_must_exceed_one() {
    for n in [1.0, 0.5] {
        let params = IceParameters { n, ..IceParameters::default() };
        assert_eq!(params.validate(), Err(ConfigError::InvalidGlenExponent(n)));
    }
    let params = IceParameters { n: 3.0, ..IceParameters::default() };
    assert_eq!(params.validate(), Ok(()));
}

#[test]
fn glen_exponent_is_rejected_from_options() {
    let options = Options::from_args(["-ice_n", "1.0"]);
    assert_eq!(
        IceParameters::from_options(&options),
        Err(ConfigError::InvalidGlenExponent(1.0))
    );
    let options = Options::from_args(["-ice_n", "0.5"]);
    assert!(IceParameters::from_options(&options).is_err());

    // Rejected before any grid is built
    let result = FveModel::<f64>::transient_ice_problem_from_options(&Options::from_args(["-ice_n", "1"]));
    assert!(matches!(result, Err(ConfigError::InvalidGlenExponent(_))));
}

#[test]
fn ice_defaults() {
    let params = IceParameters::default();
    assert_eq!(params.n, 3.0);
    assert_eq!(params.secpera, SECONDS_PER_YEAR);
    assert_scalar_eq!(params.softness, 3.17e-24, comp = abs, tol = 1e-26);
    assert_eq!(params.domain_length, 900.0e3);
    assert_eq!(params.lambda, 0.25);

    // Gamma = 2 A (rho g)^n / (n + 2)
    let rho_g: f64 = 910.0 * 9.81;
    let expected = 2.0 * params.softness * rho_g.powi(3) / 5.0;
    assert_scalar_eq!(params.gamma(), expected, comp = abs, tol = 1e-12 * expected);
}

#[test]
fn regularization_parameters_are_range_checked() {
    let bad_eps = DnlParameters { eps: 1.5, ..DnlParameters::default() };
    assert!(matches!(bad_eps.validate(), Err(ConfigError::OutOfRange { name: "eps", .. })));

    let bad_lambda = IceParameters { lambda: -0.1, ..IceParameters::default() };
    assert!(matches!(bad_lambda.validate(), Err(ConfigError::OutOfRange { name: "lambda", .. })));

    let bad_delta = DnlParameters { delta: 0.0, ..DnlParameters::default() };
    assert!(bad_delta.validate().is_err());

    let bad_p = DnlParameters { p: 1.0, ..DnlParameters::default() };
    assert_eq!(bad_p.validate(), Err(ConfigError::InvalidLaplacianExponent(1.0)));

    let bad_q = DnlParameters { q: -1.0, ..DnlParameters::default() };
    assert_eq!(bad_q.validate(), Err(ConfigError::InvalidPorousExponent(-1.0)));
}

#[test]
fn partial_json_configuration_uses_defaults() {
    let params: IceParameters = serde_json::from_str(r#"{ "n": 4.0, "A": 1e-24 }"#).unwrap();
    assert_eq!(params.n, 4.0);
    assert_scalar_eq!(params.softness, 1e-24, comp = float);
    assert_eq!(params.rho, 910.0);
    assert_eq!(params.eps, 0.001);

    let dnl: DnlParameters = serde_json::from_str(r#"{ "problem": "ice", "ice_bed": "rolling", "D0": 2.0 }"#).unwrap();
    assert_eq!(dnl.problem, ProblemKind::Ice);
    assert_eq!(dnl.ice_bed, BedKind::Rolling);
    assert_eq!(dnl.d0, 2.0);
    assert_eq!(dnl.p, 2.0);

    let cmb: CmbParameters = serde_json::from_str("{}").unwrap();
    assert_eq!(cmb, CmbParameters::default());
}

#[test]
fn dnl_options_select_problem() {
    let options = Options::from_args([
        "-dnl_problem",
        "ice",
        "-dnl_ice_bed",
        "rolling",
        "-dnl_check_admissible",
        "-dnl_lambda",
        "0",
        "-cmb_ela",
        "1500",
    ]);
    let params = DnlParameters::from_options(&options).unwrap();
    assert_eq!(params.problem, ProblemKind::Ice);
    assert_eq!(params.ice_bed, BedKind::Rolling);
    assert!(params.check_admissible);
    assert_eq!(params.lambda, 0.0);

    let (model, _) = FveModel::<f64>::steady_problem_from_options(&options).unwrap();
    assert_eq!(model.grid().boundary(), BoundaryType::Dirichlet);
    assert_eq!(model.grid().max().x, 1800.0e3);
    assert_eq!(model.lambda(), 0.0);
    assert!(model.check_admissible());
    assert_eq!(model.bed(), &BedProfile::rolling());
    assert_eq!(model.obstacle(), &ObstacleProfile::Zero);
    match model.source() {
        SourceTerm::MassBalance(cmb) => assert_eq!(cmb.ela(), 1500.0),
        SourceTerm::Zero => panic!("Ice problem must have a mass balance"),
    }
    // Ice flux exponents with the continuation parameters of the problem
    assert_eq!(model.flux().p, 4.0);
    assert_eq!(model.flux().q, 5.0);
    assert_eq!(model.flux().d0, 1.0);
}

#[test]
fn unknown_problem_is_rejected() {
    let options = Options::from_args(["-dnl_problem", "glacier"]);
    let err = DnlParameters::from_options(&options).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownChoice { .. }));
    assert!(err.to_string().contains("obstacle, ice"));
}

#[test]
fn obstacle_problem_defaults() {
    let (model, params) = FveModel::<f64>::steady_problem_from_options(&Options::new()).unwrap();
    assert_eq!(params, DnlParameters::default());
    assert_eq!((model.grid().mx(), model.grid().my()), (5, 5));
    assert_eq!(model.grid().min().x, -2.0);
    assert_eq!(model.grid().dx(), 1.0);
    assert_eq!(model.obstacle(), &ObstacleProfile::Hemisphere);
    assert_eq!(model.source(), &SourceTerm::Zero);
    assert_eq!(model.lambda(), 0.25);
}

#[test]
fn transient_ice_problem_is_periodic() {
    let options = Options::from_args(["-da_refine", "1", "-ice_lambda", "0.5"]);
    let (model, params) = FveModel::<f64>::transient_ice_problem_from_options(&options).unwrap();
    assert_eq!(params.lambda, 0.5);
    assert_eq!(model.grid().boundary(), BoundaryType::Periodic);
    assert_eq!((model.grid().mx(), model.grid().my()), (36, 36));
    assert_scalar_eq!(model.grid().dx(), 25.0e3, comp = float);
    assert_eq!(model.bed(), &BedProfile::Zero);
}

#[test]
fn excessive_refinement_is_a_configuration_error() {
    for levels in ["40", "64", "1000"] {
        let options = Options::from_args(["-da_refine", levels]);
        let result = FveModel::<f64>::transient_ice_problem_from_options(&options);
        assert!(matches!(result, Err(ConfigError::OutOfRange { name: "da_refine", .. })));
        let result = FveModel::<f64>::steady_problem_from_options(&options);
        assert!(matches!(result, Err(ConfigError::OutOfRange { name: "da_refine", .. })));
    }

    // Parameters built in code are checked when the grid is refined
    let grid = GridParameters { refine: 64, ..GridParameters::new(5, 5) };
    let result = FveModel::<f64>::obstacle_problem(&DnlParameters::default(), &grid);
    assert!(matches!(result, Err(ConfigError::OutOfRange { name: "da_refine", .. })));
    assert!(GridParameters::new(5, 5).validate().is_ok());
}

#[test]
fn grid_options_require_two_nodes() {
    let options = Options::from_args(["-da_grid_x", "1"]);
    assert_eq!(
        GridParameters::from_options(&options, GridParameters::new(5, 5)),
        Err(ConfigError::TooFewNodes { mx: 1, my: 5 })
    );
}
