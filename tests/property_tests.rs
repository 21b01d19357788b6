//! Property-based tests for loading.
//!
//! Test coverage:
//! - Plain values load verbatim
//! - One layer of matching quotes is stripped
//! - Overwrite vs. preserve, including present-but-empty values
//! - References to earlier lines resolve, undefined references drop the line
//! - getenv_in distinguishes unset from empty

use std::{collections::HashMap, ffi::{OsStr, OsString}, io::Cursor};

use proptest::prelude::*;

use envfile::{build, env::EmptyEnv, getenv_in, Flags};

/// Variable names as commonly used in env files.
fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z_][A-Z0-9_]{0,15}"
}

/// Values without `=`-sensitive content: no newlines, no `${`, no surrounding
/// quotes.
fn plain_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _./:@=-]{0,24}"
}

fn load(source: &str, env: &mut HashMap<OsString, OsString>, flags: Flags) {
    build()
        .flags(flags)
        .load_reader(&mut Cursor::new(source.as_bytes()), env, &EmptyEnv())
        .expect("best-effort load never fails");
}

fn lookup<'a>(env: &'a HashMap<OsString, OsString>, name: &str) -> Option<&'a OsStr> {
    env.get(OsStr::new(name)).map(OsString::as_os_str)
}

proptest! {
    #[test]
    fn prop_plain_value_loads_verbatim(name in name_strategy(), value in plain_value_strategy()) {
        let mut env = HashMap::new();
        load(&format!("{name}={value}\n"), &mut env, Flags::NONE);

        prop_assert_eq!(lookup(&env, &name), Some(OsStr::new(&value)));
    }

    #[test]
    fn prop_one_layer_of_quotes_is_stripped(
        name in name_strategy(),
        value in plain_value_strategy(),
        quote in prop_oneof![Just('"'), Just('\'')],
    ) {
        let mut env = HashMap::new();
        load(&format!("{name}={quote}{value}{quote}\n"), &mut env, Flags::NONE);
        prop_assert_eq!(lookup(&env, &name), Some(OsStr::new(&value)));

        let mut env = HashMap::new();
        load(&format!("{name}={quote}{quote}{value}{quote}{quote}\n"), &mut env, Flags::NONE);
        let expected = format!("{quote}{value}{quote}");
        prop_assert_eq!(lookup(&env, &name), Some(OsStr::new(&expected)));
    }

    #[test]
    fn prop_collision_policy(
        name in name_strategy(),
        old in plain_value_strategy(),
        new in plain_value_strategy(),
    ) {
        let source = format!("{name}={new}\n");

        let mut env = HashMap::new();
        env.insert(OsString::from(&name), OsString::from(&old));
        load(&source, &mut env, Flags::NONE);
        prop_assert_eq!(lookup(&env, &name), Some(OsStr::new(&new)));

        // `old` may be empty: existence, not emptiness, decides
        let mut env = HashMap::new();
        env.insert(OsString::from(&name), OsString::from(&old));
        load(&source, &mut env, Flags::PRESERVE);
        prop_assert_eq!(lookup(&env, &name), Some(OsStr::new(&old)));

        let mut env = HashMap::new();
        load(&source, &mut env, Flags::PRESERVE);
        prop_assert_eq!(lookup(&env, &name), Some(OsStr::new(&new)));
    }

    #[test]
    fn prop_reference_to_earlier_line(
        value in plain_value_strategy(),
        suffix in plain_value_strategy(),
    ) {
        let mut env = HashMap::new();
        load(&format!("FIRST={value}\nSECOND=${{FIRST}}{suffix}\n"), &mut env, Flags::NONE);

        let expected = format!("{value}{suffix}");
        prop_assert_eq!(lookup(&env, "SECOND"), Some(OsStr::new(&expected)));
    }

    #[test]
    fn prop_undefined_reference_drops_line(
        name in name_strategy(),
        prefix in plain_value_strategy(),
    ) {
        let mut env = HashMap::new();
        load(&format!("TARGET={prefix}${{{name}}}\n"), &mut env, Flags::NONE);

        // a self reference is undefined too, the line isn't applied yet
        prop_assert!(env.is_empty());
    }

    #[test]
    fn prop_getenv_in(name in name_strategy(), value in plain_value_strategy(), default in plain_value_strategy()) {
        let mut env = HashMap::<String, String>::new();
        prop_assert_eq!(getenv_in(&env, &name, &default), default.clone());

        env.insert(name.clone(), value.clone());
        prop_assert_eq!(getenv_in(&env, &name, &default), value);
    }
}
