use crate::render::CanvasSize;
use std::env;
use std::net::IpAddr;
use std::sync::LazyLock;

macro_rules! define_env_vars {
    ($(($name:ident, $env_name:expr, $type:ty, $default:expr)),* $(,)?) => {
        $(
            pub static $name: LazyLock<$type> = LazyLock::new(|| {
                let val = env::var($env_name).unwrap_or_else(|_| $default.to_string());
                val.parse::<$type>().unwrap_or_else(|_| {
                    panic!(
                        "Failed to parse environment variable {} with value '{}' as {}",
                        $env_name,
                        val,
                        stringify!($type)
                    )
                })
            });
        )*

        /// Force initialization of all environment variables at startup
        /// Call this early in main() to fail fast if any env var is malformed
        pub fn check_env() {
            $(
                let _ = *$name;
            )*
        }
    };
}

// (static, variable, type, default)
define_env_vars!(
    (PORT, "PORT", u16, "4321"),
    (BIND_ADDRESS, "BIND_ADDRESS", IpAddr, "0.0.0.0"),
    (DEFAULT_CANVAS, "DEFAULT_CANVAS", CanvasSize, CanvasSize::DEFAULT),
);
