use std::env;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = "development";
    #[cfg(not(debug_assertions))]
    let default_env = "production";

    match env::var("ENVIRONMENT")
        .unwrap_or_else(|_| default_env.into())
        .as_str()
    {
        "production" => Environment::Production,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_variable_selects_production() {
        env::set_var("ENVIRONMENT", "production");
        assert_eq!(which(), Environment::Production);

        env::set_var("ENVIRONMENT", "development");
        assert_eq!(which(), Environment::Development);

        env::remove_var("ENVIRONMENT");
    }
}
