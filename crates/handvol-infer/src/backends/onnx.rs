use crate::{Backend, Device, InferError, ModelSource, Session};
use handvol_base::Tensor;
use ndarray::ArrayD;
use ort::{inputs, session::Session as OrtSession, value::TensorRef};
use std::collections::HashMap;

/// ONNX Runtime backend.
pub struct OnnxBackend {
    device: Device,
}

impl OnnxBackend {
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

impl Default for OnnxBackend {
    fn default() -> Self {
        Self::new(Device::Cpu)
    }
}

impl Backend for OnnxBackend {
    fn name(&self) -> &str {
        "onnx"
    }

    fn load_model(&self, model: ModelSource) -> Result<Box<dyn Session>, InferError> {
        let mut builder = OrtSession::builder().map_err(|e| {
            InferError::BackendError(format!("failed to create session builder: {e}"))
        })?;

        builder = match &self.device {
            Device::Cpu => {
                log::info!("onnx: using CPU execution provider");
                builder
            }
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => {
                use ort::execution_providers::CUDAExecutionProvider;
                log::info!("onnx: using CUDA execution provider (device_id={device_id})");
                builder
                    .with_execution_providers([CUDAExecutionProvider::default()
                        .with_device_id(*device_id)
                        .build()])
                    .map_err(|_| InferError::UnsupportedDevice(self.device))?
            }
            #[cfg(not(feature = "cuda"))]
            Device::Cuda { .. } => {
                return Err(InferError::UnsupportedDevice(self.device));
            }
        };

        let session = match model {
            ModelSource::File(path) => builder.commit_from_file(&path).map_err(|e| {
                InferError::ModelLoad(format!("{}: {e}", path.display()))
            })?,
            ModelSource::Memory(bytes) => builder
                .commit_from_memory(&bytes)
                .map_err(|e| InferError::ModelLoad(format!("in-memory model: {e}")))?,
        };

        let input_names: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        log::debug!("onnx: inputs {input_names:?}, outputs {output_names:?}");

        Ok(Box::new(OnnxSession {
            session,
            input_names,
            output_names,
        }))
    }
}

pub struct OnnxSession {
    session: OrtSession,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl Session for OnnxSession {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, InferError> {
        for (name, _) in inputs {
            if !self.input_names.iter().any(|n| n == name) {
                return Err(InferError::InvalidInput {
                    name: name.to_string(),
                    expected_names: self.input_names.clone(),
                });
            }
        }

        // inputs! has a fixed arity, so the supported input counts are spelled out.
        let outputs = match inputs {
            [(name, tensor)] => {
                let array = tensor_to_ndarray(tensor.clone())?;
                let value = TensorRef::from_array_view(array.view()).map_err(|e| {
                    InferError::BackendError(format!("failed to wrap input '{name}': {e}"))
                })?;
                self.session
                    .run(inputs![*name => value])
                    .map_err(|e| InferError::BackendError(format!("inference failed: {e}")))?
            }
            [(name1, tensor1), (name2, tensor2)] => {
                let array1 = tensor_to_ndarray(tensor1.clone())?;
                let array2 = tensor_to_ndarray(tensor2.clone())?;
                let value1 = TensorRef::from_array_view(array1.view()).map_err(|e| {
                    InferError::BackendError(format!("failed to wrap input '{name1}': {e}"))
                })?;
                let value2 = TensorRef::from_array_view(array2.view()).map_err(|e| {
                    InferError::BackendError(format!("failed to wrap input '{name2}': {e}"))
                })?;
                self.session
                    .run(inputs![*name1 => value1, *name2 => value2])
                    .map_err(|e| InferError::BackendError(format!("inference failed: {e}")))?
            }
            _ => {
                return Err(InferError::BackendError(format!(
                    "{} inputs given, only 1 or 2 are supported",
                    inputs.len()
                )));
            }
        };

        let mut result = HashMap::new();
        for name in &self.output_names {
            let array = outputs[name.as_str()].try_extract_array::<f32>().map_err(|e| {
                InferError::UnsupportedDtype(format!("output '{name}' is not f32: {e}"))
            })?;
            result.insert(name.clone(), ndarray_to_tensor(array)?);
        }

        Ok(result)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

pub fn tensor_to_ndarray(tensor: Tensor<f32>) -> Result<ArrayD<f32>, InferError> {
    ArrayD::from_shape_vec(tensor.shape, tensor.data)
        .map_err(|e| InferError::BackendError(format!("failed to build ndarray: {e}")))
}

pub fn ndarray_to_tensor(
    array: ndarray::ArrayView<'_, f32, ndarray::IxDyn>,
) -> Result<Tensor<f32>, InferError> {
    let shape = array.shape().to_vec();
    let data = array.iter().copied().collect();
    Ok(Tensor::new(shape, data)?)
}
