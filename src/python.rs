use std::collections::BTreeSet;

use pyo3::prelude::*;
use pyo3::types::PyDict;
use pyo3_polars::PyDataFrame;

use crate::dashboard::Dashboard;
use crate::filter::FilterSpec;

fn spec(
    years: Vec<i32>,
    categories: Vec<String>,
    regions: Vec<String>,
    channels: Vec<String>,
) -> FilterSpec {
    FilterSpec {
        years: years.into_iter().collect::<BTreeSet<_>>(),
        categories: categories.into_iter().collect(),
        regions: regions.into_iter().collect(),
        channels: channels.into_iter().collect(),
    }
}

/// Python handle on a loaded sales table.
#[pyclass(name = "SalesDashboard")]
pub struct PySalesDashboard {
    inner: Dashboard,
}

#[pymethods]
impl PySalesDashboard {
    #[new]
    fn new(path: String) -> PyResult<Self> {
        Ok(Self {
            inner: Dashboard::load(path)?,
        })
    }

    #[getter]
    fn orders_df(&self) -> PyDataFrame {
        PyDataFrame(self.inner.table().frame().clone())
    }

    /// `(years, categories, regions, channels)`, each sorted.
    fn filter_options(&self) -> PyResult<(Vec<i32>, Vec<String>, Vec<String>, Vec<String>)> {
        let o = self.inner.filter_options()?;
        Ok((o.years, o.categories, o.regions, o.channels))
    }

    fn filter(
        &self,
        years: Vec<i32>,
        categories: Vec<String>,
        regions: Vec<String>,
        channels: Vec<String>,
    ) -> PyResult<PyDataFrame> {
        let filtered = self
            .inner
            .table()
            .filter(&spec(years, categories, regions, channels))?;
        Ok(PyDataFrame(filtered.into_frame()))
    }

    /// Render every view for a filter state; returns `{view_key: DataFrame}`.
    fn render<'py>(
        &self,
        py: Python<'py>,
        years: Vec<i32>,
        categories: Vec<String>,
        regions: Vec<String>,
        channels: Vec<String>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let model = self
            .inner
            .render(&spec(years, categories, regions, channels))?;
        let dict = PyDict::new(py);
        for (kind, df) in model.views()? {
            dict.set_item(kind.key(), PyDataFrame(df))?;
        }
        dict.set_item("orders", model.selection.orders)?;
        dict.set_item("cities", model.selection.cities)?;
        dict.set_item("products", model.selection.products)?;
        Ok(dict)
    }

    #[pyo3(signature = (years, categories, regions, channels, search="", rows=10))]
    fn explore(
        &self,
        years: Vec<i32>,
        categories: Vec<String>,
        regions: Vec<String>,
        channels: Vec<String>,
        search: &str,
        rows: usize,
    ) -> PyResult<PyDataFrame> {
        let df = self.inner.explore(
            &spec(years, categories, regions, channels),
            search,
            rows,
        )?;
        Ok(PyDataFrame(df))
    }
}

#[pymodule]
#[pyo3(name = "sales_pulse")]
fn python_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySalesDashboard>()?;
    Ok(())
}
