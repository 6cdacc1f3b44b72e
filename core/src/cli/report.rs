use crate::pipeline::presentation::derive_presentation;
use crate::types::RwvmLoadable;
use std::fmt;

/// Text report formatter for discovered RWVM interpretations
pub struct LoadablesReport<'a> {
    loadables: &'a [RwvmLoadable],
}

impl<'a> LoadablesReport<'a> {
    /// Creates a new text report
    pub fn new(loadables: &'a [RwvmLoadable]) -> Self {
        Self { loadables }
    }
}

impl<'a> fmt::Display for LoadablesReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RWVM Interpretations")?;
        writeln!(f, "====================")?;
        for (number, loadable) in self.loadables.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "[{}] {}", number + 1, loadable.name)?;
            writeln!(f, "    Source:         {}", loadable.rwvm_file.display())?;
            writeln!(f, "    Units:          {}", loadable.record.units_meaning())?;
            writeln!(
                f,
                "    Quantity:       {}",
                loadable
                    .record
                    .quantity
                    .as_ref()
                    .map(|q| q.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            )?;
            writeln!(f, "    Slope:          {}", loadable.record.slope)?;
            writeln!(f, "    Confidence:     {:.2}", loadable.confidence)?;
            writeln!(
                f,
                "    Modality:       {}",
                loadable.referenced_modality.as_deref().unwrap_or("unknown")
            )?;
            writeln!(
                f,
                "    Radiotracer:    {}",
                loadable
                    .radiotracer
                    .as_ref()
                    .map(|t| t.code.clone())
                    .unwrap_or_else(|| "unknown".to_string())
            )?;
            writeln!(
                f,
                "    References:     {} instances, {} resolved",
                loadable.record.referenced_instance_uids.len(),
                loadable.files.len()
            )?;

            let policy = derive_presentation(
                loadable.referenced_modality.as_deref(),
                loadable.radiotracer.as_ref(),
            );
            if policy.auto_window_level {
                writeln!(f, "    Window/Level:   auto")?;
            } else {
                writeln!(
                    f,
                    "    Window/Level:   {}/{} ({})",
                    policy.window.unwrap_or_default(),
                    policy.level.unwrap_or_default(),
                    policy
                        .color_table
                        .map(|t| t.to_string())
                        .unwrap_or_default()
                )?;
            }
        }
        Ok(())
    }
}
