#[macro_export]
macro_rules! assert_env_eq {
    ($env:expr, $fixture:expr) => {
        for &(key, expected_value) in $fixture {
            let actual_value = $env.get(::std::ffi::OsStr::new(key));

            assert!(actual_value.is_some(), "{key:?} is expected to be set, but isn't");
            let actual_value = actual_value.unwrap();
            assert_eq!(actual_value, ::std::ffi::OsStr::new(expected_value), "{key:?} is expected to be {expected_value:?}, but is {actual_value:?}");
        }
    };
}

#[macro_export]
macro_rules! assert_env_unset {
    ($env:expr, $keys:expr) => {
        for &key in $keys {
            let actual_value = $env.get(::std::ffi::OsStr::new(key));
            assert!(actual_value.is_none(), "{key:?} is expected to be unset, but is {actual_value:?}");
        }
    };
}
