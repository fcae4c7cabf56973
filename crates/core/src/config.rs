use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use toml_edit::{DocumentMut, value};

pub static CONFIG: Lazy<HeraldConfig> = Lazy::new(|| HeraldConfig::load("Config.toml"));

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, i64, bool);

macro_rules! gen_config {
    (
        $( $name:ident: $type:ty = $default:expr),*
    ) => {
        #[derive(Serialize, Deserialize)]
        pub struct HeraldConfig {
            $(
                pub $name: $type,
            )*
        }

        impl HeraldConfig {
            fn load(config_file: &str) -> HeraldConfig {
                let str = fs::read_to_string(config_file).unwrap_or_default();
                let mut doc = str.parse::<DocumentMut>().unwrap();

                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), &mut doc);
                )*

                let patched = doc.to_string();
                if str != patched {
                    let mut file = fs::OpenOptions::new().create(true).write(true).open(config_file).unwrap();
                    write!(file, "{}", patched).unwrap();
                }

                toml::from_str(&patched).unwrap()
            }
        }
    };
}

gen_config! {
    messages_file: String = "messages.yml".to_string(),
    server_version: String = "1.20.4".to_string(),
    max_players: i64 = 20,
    default_interval: i64 = 300
}
