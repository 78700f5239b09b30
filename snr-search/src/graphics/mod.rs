mod bounds;
mod svg;

use miette::{IntoDiagnostic, miette};
use pulse_snr_common::Real;
use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};
use strum::{Display, EnumString};

pub(crate) use bounds::Bounds;
pub(crate) use svg::SvgSaver;

#[derive(Clone, EnumString, Display)]
pub(crate) enum FileFormat {
    #[strum(to_string = "svg")]
    Svg,
}

impl FileFormat {
    pub(crate) fn build_path(self, path: &Path, profile: usize) -> miette::Result<PathBuf> {
        create_dir_all(path).into_diagnostic()?;
        let mut path_buf = path.join(format!("profile_{profile}"));

        if path_buf.set_extension(self.to_string()) {
            Ok(path_buf)
        } else {
            Err(miette!(
                "Could not set file extension {} to {:?}",
                self.to_string(),
                path_buf
            ))
        }
    }
}

/// A profile together with its best-fit model.
pub(crate) struct ProfilePlot<'a> {
    pub(crate) title: String,
    pub(crate) data: &'a [Real],
    pub(crate) model: &'a [Real],
}

pub(crate) trait GraphSaver: Default {
    fn save_as_svg(
        plot: &ProfilePlot,
        path: PathBuf,
        size: (u32, u32),
        bounds: Bounds,
    ) -> miette::Result<()>;
}
