//! Engine init/shutdown refcount lifecycle.
//!
//! These assertions read the process-global guard count, so this file
//! holds exactly one test and runs alone in its own process - sibling
//! tests would move the counter underneath it.

use grapple::Engine;

#[test]
fn refcount_lifecycle() {
    assert_eq!(Engine::active_guards(), 0);

    let first = Engine::acquire().unwrap();
    assert_eq!(Engine::active_guards(), 1);

    let second = first.clone();
    let third = Engine::acquire().unwrap();
    assert_eq!(Engine::active_guards(), 3);

    drop(second);
    drop(first);
    assert_eq!(Engine::active_guards(), 1);

    drop(third);
    assert_eq!(Engine::active_guards(), 0);

    // Re-acquisition after the count returned to zero re-initializes.
    let again = Engine::acquire().unwrap();
    assert_eq!(Engine::active_guards(), 1);
    assert!(Engine::version().is_ok());
    drop(again);
    assert_eq!(Engine::active_guards(), 0);
}
