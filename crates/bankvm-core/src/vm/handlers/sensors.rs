use crate::error::VmResult;
use crate::vm::value::Value;
use crate::vm::vm::{Flow, VirtualMachine};

impl VirtualMachine {
    /// Seconds since the current run started
    pub(crate) fn sensor_tempo(&mut self) -> VmResult<Flow> {
        let elapsed = self.started_at.elapsed().as_secs_f64();
        self.stack.push(Value::Number(elapsed))?;
        Ok(Flow::Next)
    }

    pub(crate) fn sensor_juros(&mut self) -> VmResult<Flow> {
        self.stack.push(Value::Number(self.config.base_interest_rate))?;
        Ok(Flow::Next)
    }
}
