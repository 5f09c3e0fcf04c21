#![allow(dead_code)]

use env_configs::{BigInt, Record};

#[derive(Debug, Default, Record)]
pub struct Config {
    #[env(key = "BOOLEAN")]
    pub boolean: bool,

    #[env(key = "INT")]
    pub int: isize,

    #[env(key = "BIG_INT")]
    pub big_int: BigInt,

    #[env(key = "STRING")]
    pub string: String,

    #[env(key = "INT_SLICE")]
    pub int_slice: Vec<isize>,

    #[env(key = "STRING_SLICE")]
    pub string_slice: Vec<String>,

    #[env(key = "NESTED", nested)]
    pub nested: Option<Nested>,

    #[env(key = "SOME_PASSWORD")]
    pub some_password: String,
}

#[derive(Debug, Default, PartialEq, Record)]
pub struct Nested {
    #[env(key = "VALUE")]
    pub value: isize,

    #[env(key = "BIG_INT_POINTER")]
    pub big_int_pointer: Option<BigInt>,
}

/// Config with its optional nested record allocated, ready to load
pub fn config() -> Config {
    Config {
        nested: Some(Nested::default()),
        ..Config::default()
    }
}

/// Every key `Config` reads under `MY`, for unsetting around a test
pub const MY_KEYS: [&str; 9] = [
    "MY_BOOLEAN",
    "MY_INT",
    "MY_BIG_INT",
    "MY_STRING",
    "MY_INT_SLICE",
    "MY_STRING_SLICE",
    "MY_NESTED_VALUE",
    "MY_NESTED_BIG_INT_POINTER",
    "MY_SOME_PASSWORD",
];

/// Run `f` with exactly `vars` set among `MY_KEYS`
pub fn with_my_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let kvs: Vec<(&str, Option<&str>)> = MY_KEYS
        .iter()
        .map(|key| {
            let value = vars.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
            (*key, value)
        })
        .collect();
    temp_env::with_vars(kvs, f)
}
