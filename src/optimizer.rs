use crate::config::{ConfigError, LogLevel, OptimizerConfig, PassName};
use crate::js::{AnnotationMap, JsProgram};
use crate::log_info;
use crate::passes::{Pass, RemoveSuperMethodsPass};

/// An optimizer that runs optimization passes over a whole program
pub struct Optimizer {
    passes: Vec<Box<dyn Pass>>,
    log_level: LogLevel,
}

impl Optimizer {
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            log_level: LogLevel::Off,
        }
    }

    /// Add a pass to the optimizer
    pub fn add_pass(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Build the pipeline described by a configuration
    pub fn from_config(config: &OptimizerConfig) -> Result<Self, ConfigError> {
        let log_level = config.log_level();
        let mut optimizer = Self {
            passes: Vec::new(),
            log_level,
        };
        for pass in config.passes()? {
            match pass {
                PassName::RemoveSuperMethods => {
                    optimizer.add_pass(Box::new(RemoveSuperMethodsPass::with_log_level(log_level)))
                }
            }
        }
        Ok(optimizer)
    }

    /// Run all passes in order, returning the total number of statements
    /// they removed or rewrote
    pub fn run(&mut self, program: &mut JsProgram, annotations: &AnnotationMap) -> usize {
        let mut total = 0;
        for pass in &mut self.passes {
            let changed = pass.run(program, annotations);
            if self.log_level >= LogLevel::Info {
                log_info!("optimizer", pass = pass.name(), changed = changed);
            }
            total += changed;
        }
        total
    }

    /// Create a default optimization pipeline
    pub fn default_optimization_pipeline() -> Self {
        let mut optimizer = Self::new();
        optimizer.add_pass(Box::new(RemoveSuperMethodsPass::new()));
        optimizer
    }
}

/// Run the default pipeline over `program`, returning the number of
/// statements removed.
pub fn optimize(program: &mut JsProgram, annotations: &AnnotationMap) -> usize {
    Optimizer::default_optimization_pipeline().run(program, annotations)
}
