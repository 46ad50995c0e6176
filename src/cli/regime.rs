//! Field regimes selectable from the command line.

use crate::{
    cli::utils,
    field::{presets, FieldSpec, GradientProfile},
    geometry::Vec3,
};
use clap::{Arg, ArgMatches, Command};
use std::{fmt, str::FromStr};

/// Combination of electric and magnetic field to simulate in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    /// Uniform electric and magnetic field.
    Exb,
    /// No electric field and a magnetic field with a gradient.
    Grad,
    /// Uniform electric field and a magnetic field with a gradient.
    Both,
}

impl Regime {
    pub fn name(self) -> &'static str {
        match self {
            Self::Exb => "exb",
            Self::Grad => "grad",
            Self::Both => "both",
        }
    }

    /// Returns the field configurations that are studied for the regime by
    /// the `statistics` subcommand.
    pub fn statistics_configurations(self) -> [FieldSpec; 3] {
        match self {
            Self::Exb => [
                FieldSpec::uniform(presets::electric_field_1(), presets::magnetic_field_1()),
                FieldSpec::uniform(presets::electric_field_2(), presets::magnetic_field_1()),
                FieldSpec::uniform(presets::electric_field_1(), presets::magnetic_field_2()),
            ],
            Self::Grad => GradientProfile::all()
                .map(|profile| FieldSpec::gradient(Vec3::zero(), profile)),
            Self::Both => [
                FieldSpec::gradient(presets::electric_field_1(), GradientProfile::Weak),
                FieldSpec::gradient(presets::electric_field_2(), GradientProfile::Strong),
                FieldSpec::gradient(presets::electric_field_1(), GradientProfile::Reversed),
            ],
        }
    }

    /// Returns the default field configuration for the regime, using the
    /// given gradient profile where the magnetic field is not uniform.
    pub fn default_fields(self, profile: GradientProfile) -> FieldSpec {
        match self {
            Self::Exb => {
                FieldSpec::uniform(presets::electric_field_1(), presets::magnetic_field_1())
            }
            Self::Grad => FieldSpec::gradient(Vec3::zero(), profile),
            Self::Both => FieldSpec::gradient(presets::electric_field_1(), profile),
        }
    }
}

impl FromStr for Regime {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "exb" => Ok(Self::Exb),
            "grad" => Ok(Self::Grad),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "Invalid regime {}, valid regimes are exb, grad and both",
                other
            )),
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Creates the positional argument selecting the field regime.
pub fn create_regime_argument() -> Arg<'static> {
    Arg::new("regime")
        .value_name("REGIME")
        .help(
            "Field regime\n\
             (exb: uniform E and B, grad: no E and B with gradient,\n \
             both: uniform E and B with gradient)",
        )
        .required(true)
        .takes_value(true)
        .possible_values(&["exb", "grad", "both"])
}

/// Adds the argument selecting the gradient profile of the magnetic field.
pub fn add_gradient_argument(command: Command<'static>) -> Command<'static> {
    command.arg(
        Arg::new("gradient")
            .short('g')
            .long("gradient")
            .require_equals(true)
            .value_name("PROFILE")
            .help(
                "Gradient profile of the magnetic field in the grad and both regimes\n\
                 (1: Bz = 1e-5 + 5e-5 x, 2: Bz = 1e-2 + 2e-2 x, 3: Bz = -5e-4 - 8e-4 x)\n",
            )
            .takes_value(true)
            .possible_values(&["1", "2", "3"])
            .default_value("1"),
    )
}

/// Adds arguments for specifying the field configuration.
pub fn add_field_arguments(command: Command<'static>) -> Command<'static> {
    add_gradient_argument(command)
        .arg(
            Arg::new("electric-field")
                .short('e')
                .long("electric-field")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_names(&["EX", "EY", "EZ"])
                .help(
                    "Uniform electric field in the exb and both regimes [V/m]\n \
                     [default: 1e-2,1e-2,0]",
                )
                .takes_value(true)
                .number_of_values(3),
        )
        .arg(
            Arg::new("magnetic-field")
                .short('b')
                .long("magnetic-field")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_names(&["BX", "BY", "BZ"])
                .help("Uniform magnetic field in the exb regime [T]\n")
                .takes_value(true)
                .number_of_values(3)
                .default_value("0,0,1e-4"),
        )
}

pub fn parse_regime(arguments: &ArgMatches) -> Regime {
    utils::get_value_from_required_parseable_argument(arguments, "regime")
}

pub fn parse_gradient_profile(arguments: &ArgMatches) -> GradientProfile {
    utils::get_value_from_required_parseable_argument(arguments, "gradient")
}

/// Constructs the field configuration for the given regime from the
/// field arguments.
pub fn construct_fields_from_arguments(regime: Regime, arguments: &ArgMatches) -> FieldSpec {
    let electric_field = utils::parse_3d_float_values(arguments, "electric-field");
    match regime {
        Regime::Exb => FieldSpec::uniform(
            electric_field.unwrap_or_else(presets::electric_field_1),
            utils::parse_3d_float_values(arguments, "magnetic-field")
                .unwrap_or_else(presets::magnetic_field_1),
        ),
        Regime::Grad => {
            if electric_field.is_some() {
                eprintln!("Warning: Ignoring electric field in grad regime");
            }
            warn_if_uniform_magnetic_field_given(regime, arguments);
            FieldSpec::gradient(Vec3::zero(), parse_gradient_profile(arguments))
        }
        Regime::Both => {
            warn_if_uniform_magnetic_field_given(regime, arguments);
            FieldSpec::gradient(
                electric_field.unwrap_or_else(presets::electric_field_1),
                parse_gradient_profile(arguments),
            )
        }
    }
}

fn warn_if_uniform_magnetic_field_given(regime: Regime, arguments: &ArgMatches) {
    if arguments.occurrences_of("magnetic-field") > 0 {
        eprintln!(
            "Warning: Ignoring uniform magnetic field in {} regime, using gradient profile",
            regime
        );
    }
}
