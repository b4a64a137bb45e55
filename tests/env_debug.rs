//! `FAZI_DEBUG` handling. Kept in its own test binary, as a single test,
//! because it mutates the process environment.

use std::env;

use fazi_bridge::{options::DEBUG_ENV_VAR, RuntimeOptions, Session};

#[test]
fn debug_flag_follows_the_environment() {
    env::remove_var(DEBUG_ENV_VAR);
    assert!(!RuntimeOptions::from_env().debug);
    assert!(!Session::builder().build().options().debug);

    env::set_var(DEBUG_ENV_VAR, "1");
    assert!(RuntimeOptions::from_env().debug);
    assert!(Session::builder().build().options().debug);

    // the environment turns debug on for parsed arguments too
    let parsed = RuntimeOptions::try_parse_from_args(["fazi-bridge", "--sync"]).unwrap();
    assert!(parsed.debug);
    assert!(parsed.sync);

    for off in ["0", "false", "OFF", ""] {
        env::set_var(DEBUG_ENV_VAR, off);
        assert!(!RuntimeOptions::from_env().debug, "{off:?} should be off");

        // ...but can't turn an explicit --debug off
        let parsed = RuntimeOptions::try_parse_from_args(["fazi-bridge", "--debug"]).unwrap();
        assert!(parsed.debug, "{off:?} must not override --debug");
    }

    env::remove_var(DEBUG_ENV_VAR);
    let parsed = RuntimeOptions::try_parse_from_args(["fazi-bridge"]).unwrap();
    assert!(!parsed.debug);
}
