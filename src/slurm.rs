use crate::config::{BatchDirectives, RunConfig};

/// Render the batch submission wrapper for a case.
///
/// The scheduler consumes the leading `#SBATCH` annotations; the body
/// re-invokes foamrun with the same timing parameters so the submitted
/// job and the emitted script cannot drift apart.
pub fn render_submission_script(batch: &BatchDirectives, run: &RunConfig) -> String {
    let mut directives = vec![
        format!("#SBATCH --job-name={}", batch.job_name),
        format!("#SBATCH --partition={}", batch.partition),
        format!("#SBATCH --nodes={}", batch.nodes),
        format!("#SBATCH --ntasks={}", batch.ntasks),
    ];
    if let Some(mem) = &batch.mem_per_cpu {
        directives.push(format!("#SBATCH --mem-per-cpu={mem}"));
    }
    directives.push(format!("#SBATCH --time={}", run.walltime));
    directives.push(format!("#SBATCH --output={}", batch.output));
    if let Some(mail_type) = &batch.mail_type {
        directives.push(format!("#SBATCH --mail-type={mail_type}"));
        if let Some(mail_user) = &batch.mail_user {
            directives.push(format!("#SBATCH --mail-user={mail_user}"));
        }
    }
    if batch.singleton {
        directives.push("#SBATCH --dependency=singleton".to_string());
    }

    format!(
        "#!/bin/bash\n{}\n\nfoamrun run \\\n    --case {} \\\n    --solver {} \\\n    --ranks {} \\\n    --walltime {} \\\n    --safety-factor {}\n",
        directives.join("\n"),
        run.solver.case_dir.display(),
        run.solver.solver,
        run.solver.ranks,
        run.walltime,
        run.safety_factor,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::walltime::Walltime;
    use std::path::PathBuf;

    fn test_run_config() -> RunConfig {
        RunConfig {
            walltime: Walltime::new(1, 12, 0, 0),
            solver: SolverConfig {
                solver: "reactingFoam".to_string(),
                case_dir: PathBuf::from("/scratch/volvo"),
                ranks: 64,
                ..SolverConfig::default()
            },
            ..RunConfig::default()
        }
    }

    #[test]
    fn renders_required_directives() {
        let script = render_submission_script(&BatchDirectives::default(), &test_run_config());
        assert!(script.starts_with("#!/bin/bash\n"));
        assert!(script.contains("#SBATCH --job-name=foamrun"));
        assert!(script.contains("#SBATCH --partition=compute"));
        assert!(script.contains("#SBATCH --time=1-12:00:00"));
        assert!(script.contains("#SBATCH --dependency=singleton"));
        assert!(script.contains("--case /scratch/volvo"));
        assert!(script.contains("--ranks 64"));
    }

    #[test]
    fn mail_user_requires_mail_type() {
        let batch = BatchDirectives {
            mail_type: None,
            mail_user: Some("user@example.org".to_string()),
            ..BatchDirectives::default()
        };
        let script = render_submission_script(&batch, &test_run_config());
        assert!(!script.contains("--mail-type"));
        assert!(!script.contains("--mail-user"));
    }

    #[test]
    fn optional_directives_omitted_by_default() {
        let script = render_submission_script(&BatchDirectives::default(), &test_run_config());
        assert!(!script.contains("--mem-per-cpu"));
        assert!(!script.contains("--mail-user"));
    }

    #[test]
    fn mem_and_mail_rendered_when_set() {
        let batch = BatchDirectives {
            mem_per_cpu: Some("3G".to_string()),
            mail_user: Some("user@example.org".to_string()),
            ..BatchDirectives::default()
        };
        let script = render_submission_script(&batch, &test_run_config());
        assert!(script.contains("#SBATCH --mem-per-cpu=3G"));
        assert!(script.contains("#SBATCH --mail-type=END,FAIL"));
        assert!(script.contains("#SBATCH --mail-user=user@example.org"));
    }
}
