//! Launcher environment runtime
//!
//! Distributed launchers record each spawned process's identity in its
//! environment before exec: the launcher assigns ranks, so the environment is
//! the externally-owned record of an initialized process group. This module
//! observes that record. It never writes a variable and never caches a value;
//! every query re-reads the environment, so a group that appears (or a
//! variable that changes) between calls is reflected immediately.
//!
//! # Schemes
//!
//! - **torchrun** (default): `RANK` / `WORLD_SIZE`
//! - **SLURM** (`srun`): `SLURM_PROCID` / `SLURM_NTASKS`
//! - **Open MPI** (`mpirun`): `OMPI_COMM_WORLD_RANK` / `OMPI_COMM_WORLD_SIZE`
//! - any custom pair via [`LauncherEnv::with_vars`]
//!
//! A half-set, unparseable, or inconsistent environment collapses to the
//! uninitialized state, exactly like no environment at all. The strict
//! [`validate`](LauncherEnv::validate) path exists so startup code can still
//! tell a broken launcher from an ordinary standalone run.
//!
//! # Example
//!
//! ```no_run
//! use distrank::runtime::launcher::LauncherEnv;
//!
//! let launcher = LauncherEnv::slurm();
//! match launcher.validate() {
//!     Ok(Some(facts)) => println!("process {} of {}", facts.rank, facts.world_size),
//!     Ok(None) => println!("not launched by srun"),
//!     Err(error) => eprintln!("broken launcher environment: {error}"),
//! }
//! ```

use super::DistRuntime;
use std::ffi::OsString;
use thiserror::Error;

/// Rank and world size parsed from a launcher environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupFacts {
    /// Zero-based rank of this process
    pub rank: usize,
    /// Total number of launched processes
    pub world_size: usize,
}

/// Why a launcher environment was rejected
///
/// Returned only by [`LauncherEnv::validate`]. The trait queries never
/// surface these; they collapse every rejection to the uninitialized state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LauncherEnvError {
    /// One variable of the pair is set without the other
    #[error("{present} is set but {missing} is not")]
    IncompleteScheme { present: String, missing: String },

    /// A variable is set but does not parse as a non-negative integer
    #[error("{var}={value:?} is not a non-negative integer")]
    Malformed { var: String, value: String },

    /// The world-size variable parsed as zero
    #[error("{var} declares a world size of 0")]
    ZeroWorldSize { var: String },

    /// Rank does not fit the declared world size
    #[error("rank {rank} is out of bounds for world size {world_size}")]
    RankOutOfBounds { rank: usize, world_size: usize },
}

/// Runtime that observes launcher-populated environment variables
///
/// Holds only the two variable names, never their values. Each query reads
/// the environment afresh, which keeps the no-caching contract of the facade:
/// external initialization may happen at any point relative to the first
/// query.
///
/// `is_available()` is always true for this runtime. The process environment
/// is observable in every build; whether a process group exists is what
/// `is_initialized()` answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherEnv {
    rank_var: String,
    world_size_var: String,
}

impl LauncherEnv {
    /// torchrun-style scheme: `RANK` and `WORLD_SIZE`
    pub fn new() -> Self {
        Self::with_vars("RANK", "WORLD_SIZE")
    }

    /// SLURM scheme: `SLURM_PROCID` and `SLURM_NTASKS`
    pub fn slurm() -> Self {
        Self::with_vars("SLURM_PROCID", "SLURM_NTASKS")
    }

    /// Open MPI scheme: `OMPI_COMM_WORLD_RANK` and `OMPI_COMM_WORLD_SIZE`
    pub fn open_mpi() -> Self {
        Self::with_vars("OMPI_COMM_WORLD_RANK", "OMPI_COMM_WORLD_SIZE")
    }

    /// Custom variable pair for launchers with their own naming
    pub fn with_vars(rank_var: impl Into<String>, world_size_var: impl Into<String>) -> Self {
        Self {
            rank_var: rank_var.into(),
            world_size_var: world_size_var.into(),
        }
    }

    /// Name of the rank variable this runtime reads
    pub fn rank_var(&self) -> &str {
        &self.rank_var
    }

    /// Name of the world-size variable this runtime reads
    pub fn world_size_var(&self) -> &str {
        &self.world_size_var
    }

    /// Strict read of the launcher environment
    ///
    /// Distinguishes the three states the trait queries deliberately blur:
    ///
    /// - `Ok(None)`: neither variable is set; an ordinary standalone run
    /// - `Ok(Some(facts))`: a complete, consistent launcher environment
    /// - `Err(..)`: variables are present but half-set, unparseable, or
    ///   inconsistent
    ///
    /// Intended for startup diagnostics. A typo'd `WORLD_SIZE` otherwise
    /// degrades silently into a single-process run.
    pub fn validate(&self) -> Result<Option<GroupFacts>, LauncherEnvError> {
        let rank_raw = std::env::var_os(&self.rank_var);
        let size_raw = std::env::var_os(&self.world_size_var);

        let (rank_raw, size_raw) = match (rank_raw, size_raw) {
            (None, None) => return Ok(None),
            (Some(rank_raw), Some(size_raw)) => (rank_raw, size_raw),
            (Some(_), None) => {
                return Err(LauncherEnvError::IncompleteScheme {
                    present: self.rank_var.clone(),
                    missing: self.world_size_var.clone(),
                })
            }
            (None, Some(_)) => {
                return Err(LauncherEnvError::IncompleteScheme {
                    present: self.world_size_var.clone(),
                    missing: self.rank_var.clone(),
                })
            }
        };

        let rank = parse_count(&self.rank_var, rank_raw)?;
        let world_size = parse_count(&self.world_size_var, size_raw)?;

        if world_size == 0 {
            return Err(LauncherEnvError::ZeroWorldSize {
                var: self.world_size_var.clone(),
            });
        }
        if rank >= world_size {
            return Err(LauncherEnvError::RankOutOfBounds { rank, world_size });
        }

        Ok(Some(GroupFacts { rank, world_size }))
    }

    /// Permissive read backing the trait queries
    ///
    /// Every rejection becomes None. Logged at debug level only; the trait
    /// queries are re-evaluated per call and must not be able to spam.
    fn facts(&self) -> Option<GroupFacts> {
        match self.validate() {
            Ok(facts) => facts,
            Err(error) => {
                tracing::debug!(%error, "launcher environment rejected, using single-process defaults");
                None
            }
        }
    }
}

impl Default for LauncherEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl DistRuntime for LauncherEnv {
    fn is_available(&self) -> bool {
        true
    }

    fn is_initialized(&self) -> bool {
        self.facts().is_some()
    }

    fn rank(&self) -> usize {
        self.facts().map(|facts| facts.rank).unwrap_or(0)
    }

    fn world_size(&self) -> usize {
        self.facts().map(|facts| facts.world_size).unwrap_or(1)
    }
}

/// Parse one environment value as a count, keeping the raw text for errors
fn parse_count(var: &str, raw: OsString) -> Result<usize, LauncherEnvError> {
    let text = match raw.into_string() {
        Ok(text) => text,
        Err(raw) => {
            return Err(LauncherEnvError::Malformed {
                var: var.to_string(),
                value: raw.to_string_lossy().into_owned(),
            })
        }
    };

    match text.trim().parse() {
        Ok(value) => Ok(value),
        Err(_) => Err(LauncherEnvError::Malformed {
            var: var.to_string(),
            value: text,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(launcher_env)]
    fn test_absent_environment_is_uninitialized() {
        temp_env::with_vars_unset(["RANK", "WORLD_SIZE"], || {
            let runtime = LauncherEnv::new();
            assert!(runtime.is_available());
            assert!(!runtime.is_initialized());
            assert_eq!(runtime.rank(), 0);
            assert_eq!(runtime.world_size(), 1);
            assert_eq!(runtime.validate(), Ok(None));
        });
    }

    #[test]
    #[serial(launcher_env)]
    fn test_complete_environment_is_initialized() {
        temp_env::with_vars([("RANK", Some("3")), ("WORLD_SIZE", Some("8"))], || {
            let runtime = LauncherEnv::new();
            assert!(runtime.is_available());
            assert!(runtime.is_initialized());
            assert_eq!(runtime.rank(), 3);
            assert_eq!(runtime.world_size(), 8);
            assert_eq!(
                runtime.validate(),
                Ok(Some(GroupFacts {
                    rank: 3,
                    world_size: 8
                }))
            );
        });
    }

    #[test]
    #[serial(launcher_env)]
    fn test_half_set_scheme_is_rejected() {
        temp_env::with_vars([("RANK", Some("3")), ("WORLD_SIZE", None)], || {
            let runtime = LauncherEnv::new();
            assert!(!runtime.is_initialized());
            assert_eq!(runtime.rank(), 0);
            assert_eq!(runtime.world_size(), 1);
            assert_eq!(
                runtime.validate(),
                Err(LauncherEnvError::IncompleteScheme {
                    present: "RANK".to_string(),
                    missing: "WORLD_SIZE".to_string(),
                })
            );
        });
    }

    #[test]
    #[serial(launcher_env)]
    fn test_malformed_values_are_rejected() {
        for bad in ["three", "-1", "", "3.5"] {
            temp_env::with_vars([("RANK", Some(bad)), ("WORLD_SIZE", Some("8"))], || {
                let runtime = LauncherEnv::new();
                assert!(!runtime.is_initialized(), "RANK={:?} accepted", bad);
                assert_eq!(runtime.rank(), 0);
                assert_eq!(
                    runtime.validate(),
                    Err(LauncherEnvError::Malformed {
                        var: "RANK".to_string(),
                        value: bad.to_string(),
                    })
                );
            });
        }
    }

    #[test]
    #[serial(launcher_env)]
    fn test_surrounding_whitespace_is_tolerated() {
        temp_env::with_vars([("RANK", Some(" 3 ")), ("WORLD_SIZE", Some("8\n"))], || {
            let runtime = LauncherEnv::new();
            assert!(runtime.is_initialized());
            assert_eq!(runtime.rank(), 3);
            assert_eq!(runtime.world_size(), 8);
        });
    }

    #[test]
    #[serial(launcher_env)]
    fn test_zero_world_size_is_rejected() {
        temp_env::with_vars([("RANK", Some("0")), ("WORLD_SIZE", Some("0"))], || {
            let runtime = LauncherEnv::new();
            assert!(!runtime.is_initialized());
            assert_eq!(runtime.world_size(), 1);
            assert_eq!(
                runtime.validate(),
                Err(LauncherEnvError::ZeroWorldSize {
                    var: "WORLD_SIZE".to_string(),
                })
            );
        });
    }

    #[test]
    #[serial(launcher_env)]
    fn test_rank_out_of_bounds_is_rejected() {
        temp_env::with_vars([("RANK", Some("8")), ("WORLD_SIZE", Some("8"))], || {
            let runtime = LauncherEnv::new();
            assert!(!runtime.is_initialized());
            assert_eq!(runtime.rank(), 0);
            assert_eq!(
                runtime.validate(),
                Err(LauncherEnvError::RankOutOfBounds {
                    rank: 8,
                    world_size: 8,
                })
            );
        });
    }

    #[test]
    #[serial(launcher_env)]
    fn test_queries_reflect_environment_changes() {
        let runtime = LauncherEnv::new();
        temp_env::with_vars_unset(["RANK", "WORLD_SIZE"], || {
            assert!(!runtime.is_initialized());

            temp_env::with_vars([("RANK", Some("1")), ("WORLD_SIZE", Some("4"))], || {
                assert_eq!(runtime.rank(), 1);
                // Same runtime value, new environment: the answer must move.
                temp_env::with_var("RANK", Some("2"), || {
                    assert_eq!(runtime.rank(), 2);
                });
                assert_eq!(runtime.rank(), 1);
            });

            assert!(!runtime.is_initialized());
        });
    }

    #[test]
    #[serial(launcher_env)]
    fn test_slurm_scheme_reads_slurm_vars() {
        temp_env::with_vars(
            [
                ("SLURM_PROCID", Some("2")),
                ("SLURM_NTASKS", Some("4")),
                ("RANK", None),
                ("WORLD_SIZE", None),
            ],
            || {
                let runtime = LauncherEnv::slurm();
                assert!(runtime.is_initialized());
                assert_eq!(runtime.rank(), 2);
                assert_eq!(runtime.world_size(), 4);

                // The torchrun scheme must not see SLURM's variables.
                assert!(!LauncherEnv::new().is_initialized());
            },
        );
    }

    #[test]
    #[serial(launcher_env)]
    fn test_open_mpi_scheme_reads_ompi_vars() {
        temp_env::with_vars(
            [
                ("OMPI_COMM_WORLD_RANK", Some("5")),
                ("OMPI_COMM_WORLD_SIZE", Some("6")),
            ],
            || {
                let runtime = LauncherEnv::open_mpi();
                assert!(runtime.is_initialized());
                assert_eq!(runtime.rank(), 5);
                assert_eq!(runtime.world_size(), 6);
            },
        );
    }

    #[test]
    #[serial(launcher_env)]
    fn test_custom_scheme() {
        temp_env::with_vars(
            [("MY_RANK", Some("0")), ("MY_PEERS", Some("2"))],
            || {
                let runtime = LauncherEnv::with_vars("MY_RANK", "MY_PEERS");
                assert_eq!(runtime.rank_var(), "MY_RANK");
                assert_eq!(runtime.world_size_var(), "MY_PEERS");
                assert!(runtime.is_initialized());
                assert_eq!(runtime.world_size(), 2);
            },
        );
    }

    #[test]
    fn test_default_is_torchrun_scheme() {
        let runtime = LauncherEnv::default();
        assert_eq!(runtime.rank_var(), "RANK");
        assert_eq!(runtime.world_size_var(), "WORLD_SIZE");
        assert_eq!(runtime, LauncherEnv::new());
    }

    #[test]
    fn test_error_messages_name_the_variable() {
        let error = LauncherEnvError::Malformed {
            var: "WORLD_SIZE".to_string(),
            value: "eight".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "WORLD_SIZE=\"eight\" is not a non-negative integer"
        );

        let error = LauncherEnvError::RankOutOfBounds {
            rank: 8,
            world_size: 8,
        };
        assert_eq!(error.to_string(), "rank 8 is out of bounds for world size 8");
    }
}
