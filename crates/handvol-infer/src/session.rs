use crate::InferError;
use handvol_base::Tensor;
use std::collections::HashMap;

/// A loaded model ready to run.
pub trait Session {
    /// Run the model once. Returns every output keyed by name.
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, InferError>;

    fn input_names(&self) -> &[String];

    /// Output names in the order the model declares them.
    fn output_names(&self) -> &[String];
}
