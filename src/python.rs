use numpy::ndarray::Array2;
use numpy::{Element, PyArray2, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::model::{ModelKind, SeirModel};
use crate::trajectory::Trajectory;

impl From<SimError> for PyErr {
    fn from(err: SimError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

fn read_array1<T: Copy + Element>(
    array: &PyReadonlyArray1<'_, T>,
    name: &str,
) -> Result<Vec<T>, SimError> {
    array
        .as_slice()
        .map(<[T]>::to_vec)
        .map_err(|_| SimError::InvalidArgument(format!("{name} array must be contiguous")))
}

fn trajectory_into_py<'py>(
    py: Python<'py>,
    trajectory: Trajectory,
) -> PyResult<Bound<'py, PyArray2<u64>>> {
    let shape = trajectory.shape();
    let array = Array2::from_shape_vec(shape, trajectory.into_data())
        .map_err(|e| PyValueError::new_err(format!("failed to export trajectory: {e}")))?;
    Ok(PyArray2::from_owned_array(py, array))
}

fn run_detached<'py>(
    py: Python<'py>,
    model: &SeirModel,
    parameters: PyReadonlyArray1<'py, f64>,
    times: PyReadonlyArray1<'py, f64>,
) -> PyResult<Bound<'py, PyArray2<u64>>> {
    let parameters = read_array1(&parameters, "parameters")?;
    let times = read_array1(&times, "times")?;
    let trajectory = py.detach(|| model.simulate(&parameters, &times))?;
    trajectory_into_py(py, trajectory)
}

/// A stochastic epidemic model instance.
#[pyclass(name = "SEIRModel", module = "seir_gillespie")]
#[derive(Clone)]
pub struct PySeirModel {
    inner: SeirModel,
}

#[pymethods]
impl PySeirModel {
    fn n_parameters(&self) -> usize {
        self.inner.n_parameters()
    }

    fn n_outputs(&self) -> usize {
        self.inner.n_outputs()
    }

    fn parameter_names(&self) -> Vec<&'static str> {
        self.inner.parameter_names().to_vec()
    }

    fn output_names(&self) -> Vec<&'static str> {
        self.inner.output_names()
    }

    fn set_outputs(&mut self, outputs: Vec<String>) -> PyResult<()> {
        Ok(self.inner.set_outputs(&outputs)?)
    }

    /// Simulate one trajectory. Returns an integer array of shape
    /// `(len(times), n_outputs())`.
    #[pyo3(signature = (parameters, times, seed=None))]
    fn simulate<'py>(
        &self,
        py: Python<'py>,
        parameters: PyReadonlyArray1<'py, f64>,
        times: PyReadonlyArray1<'py, f64>,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray2<u64>>> {
        let mut model = self.inner.clone();
        if seed.is_some() {
            model.config_mut().seed = seed;
        }
        run_detached(py, &model, parameters, times)
    }

    fn __repr__(&self) -> String {
        format!(
            "SEIRModel(kind='{}', outputs={:?})",
            self.inner.kind(),
            self.inner.output_names()
        )
    }
}

#[pyclass(name = "SEIRModelFactory", module = "seir_gillespie")]
#[derive(Default)]
pub struct PyModelFactory;

#[pymethods]
impl PyModelFactory {
    #[new]
    fn new() -> Self {
        Self
    }

    #[pyo3(name = "gillespieSEIR")]
    fn gillespie_seir(&self) -> PySeirModel {
        PySeirModel {
            inner: ModelKind::GillespieSeir.build(),
        }
    }

    /// Build a model by kind name, e.g. `"gillespie_seir"`.
    fn create(&self, kind: &str) -> PyResult<PySeirModel> {
        let kind: ModelKind = kind.parse()?;
        Ok(PySeirModel { inner: kind.build() })
    }

    #[staticmethod]
    fn kinds() -> Vec<&'static str> {
        ModelKind::ALL.iter().map(|kind| kind.name()).collect()
    }
}

/// Simulate the SEIR model once.
///
/// `parameters` is `[S0, E0, I0, R0, beta, kappa, gamma]`; the result has one
/// row per entry of `times` and columns `[S, E, I, R]`.
#[pyfunction(signature = (parameters, times, seed=None, max_time_step=None))]
pub fn simulate<'py>(
    py: Python<'py>,
    parameters: PyReadonlyArray1<'py, f64>,
    times: PyReadonlyArray1<'py, f64>,
    seed: Option<u64>,
    max_time_step: Option<f64>,
) -> PyResult<Bound<'py, PyArray2<u64>>> {
    let mut config = SimulationConfig::default().with_seed(seed);
    if let Some(step) = max_time_step {
        config = config.with_max_time_step(step);
    }
    let model = SeirModel::new(ModelKind::GillespieSeir).with_config(config);
    run_detached(py, &model, parameters, times)
}

#[pymodule]
fn seir_gillespie(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_function(wrap_pyfunction!(simulate, module)?)?;
    module.add_class::<PySeirModel>()?;
    module.add_class::<PyModelFactory>()?;
    Ok(())
}
