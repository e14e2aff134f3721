use std::fs;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::Parser;

use crate::rule::{Mode, TranslationRule};

/// Transparent UDP packet redirector
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Destination port the redirector will filter for
    #[arg(short, long, required_unless_present = "config")]
    pub listen_port: Option<u16>,
    /// Port the redirector will forward traffic to
    #[arg(short, long, required_unless_present = "config")]
    pub forward_port: Option<u16>,
    /// Address the redirector will forward traffic to
    #[arg(short = 'a', long, required_unless_present = "config")]
    pub forward_address: Option<Ipv4Addr>,
    /// Local address the redirected traffic will appear to originate from
    #[arg(short, long, required_unless_present = "config")]
    pub source_address: Option<Ipv4Addr>,
    /// Send path to use
    #[arg(short, long, value_enum, default_value_t = Mode::Raw)]
    pub mode: Mode,
    /// Path of a TOML file defining the whole translation rule instead of
    /// the flags above
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Builds the translation rule the pipeline will run under, either
    /// from the TOML file or from the individual flags (clap has already
    /// enforced that one of the two is complete).
    pub fn translation_rule(&self) -> Result<TranslationRule, String> {
        if let Some(path) = &self.config {
            let config = fs::read_to_string(path)
                .map_err(|e| format!("could not read {}: {e}", path.display()))?;
            return TranslationRule::from_toml_str(&config)
                .map_err(|e| format!("could not parse {}: {e}", path.display()));
        }

        Ok(TranslationRule {
            listen_port: self.listen_port.ok_or("missing listen port")?,
            forward_port: self.forward_port.ok_or("missing forward port")?,
            forward_address: self.forward_address.ok_or("missing forward address")?,
            source_address: self.source_address.ok_or("missing source address")?,
            mode: self.mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use crate::rule::{Mode, TranslationRule};
    use clap::Parser;
    use std::net::Ipv4Addr;

    #[test]
    fn test_args_build_a_rule_from_flags() {
        let args = Args::parse_from([
            "redirector",
            "-l",
            "5555",
            "-f",
            "6000",
            "-a",
            "10.0.0.5",
            "-s",
            "10.0.0.1",
            "--mode",
            "udp",
        ]);
        assert_eq!(
            args.translation_rule().unwrap(),
            TranslationRule {
                listen_port: 5555,
                forward_port: 6000,
                forward_address: Ipv4Addr::new(10, 0, 0, 5),
                source_address: Ipv4Addr::new(10, 0, 0, 1),
                mode: Mode::Udp,
            }
        );
    }

    #[test]
    fn test_mode_defaults_to_raw() {
        let args = Args::parse_from([
            "redirector",
            "-l",
            "5555",
            "-f",
            "6000",
            "-a",
            "10.0.0.5",
            "-s",
            "10.0.0.1",
        ]);
        assert_eq!(args.translation_rule().unwrap().mode, Mode::Raw);
    }

    #[test]
    fn test_flags_are_required_without_config() {
        assert!(Args::try_parse_from(["redirector", "-l", "5555"]).is_err());
    }

    #[test]
    fn test_invalid_address_is_rejected_by_clap() {
        assert!(Args::try_parse_from([
            "redirector",
            "-l",
            "5555",
            "-f",
            "6000",
            "-a",
            "not-an-address",
            "-s",
            "10.0.0.1",
        ])
        .is_err());
    }
}
