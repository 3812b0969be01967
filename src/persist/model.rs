use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::math::matrix::Matrix;
use crate::network::Network;

/// Serializable snapshot of a network's learned parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub layers: Vec<usize>,
    pub weights: Vec<Matrix>,
    pub biases: Vec<Matrix>,
}

impl ModelFile {
    pub fn from_network(network: &Network) -> ModelFile {
        let layers = network.fully_connected_layers();
        ModelFile {
            layers: network.layer_sizes().to_vec(),
            weights: layers.iter().map(|l| l.weights().clone()).collect(),
            biases: layers.iter().map(|l| l.biases().clone()).collect(),
        }
    }

    pub fn into_network(self) -> Result<Network, DataError> {
        for m in self.weights.iter().chain(&self.biases) {
            let (rows, cols) = m.shape();
            if rows == 0 || cols == 0 || rows.checked_mul(cols) != Some(m.as_slice().len()) {
                return Err(DataError::Parse(format!(
                    "{}x{} matrix holds {} values",
                    rows,
                    cols,
                    m.as_slice().len()
                )));
            }
        }
        Ok(Network::from_parameters(&self.layers, self.weights, self.biases)?)
    }
}

/// Writes the network in the plain text layout:
///
/// ```text
/// <layer count>
/// <n0> <n1> ... <nL>
/// <W(0) row 0>
/// ...
/// <W(0) row n1-1>
/// <B(0) on one line>
/// ... same for every fully-connected layer
/// ```
pub fn save_text(network: &Network, path: &Path) -> Result<(), DataError> {
    let file = File::create(path).map_err(|e| DataError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_text(network, &mut out).map_err(|e| DataError::io(path, e))?;
    info!("saved model to {}", path.display());
    Ok(())
}

fn write_text<W: Write>(network: &Network, out: &mut W) -> std::io::Result<()> {
    let sizes = network.layer_sizes();
    writeln!(out, "{}", sizes.len())?;
    writeln!(out, "{}", join(sizes.iter()))?;
    for layer in network.fully_connected_layers() {
        let w = layer.weights();
        for row in w.as_slice().chunks(w.cols()) {
            writeln!(out, "{}", join(row.iter()))?;
        }
        writeln!(out, "{}", join(layer.biases().as_slice().iter()))?;
    }
    out.flush()
}

fn join<T: ToString>(values: impl Iterator<Item = T>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
}

/// Reads a network written by [`save_text`]. Line breaks are not
/// significant; values are read in order as whitespace-separated tokens.
pub fn load_text(path: &Path) -> Result<Network, DataError> {
    let content = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let network = parse_text(&content)?;
    info!("loaded model {:?} from {}", network.layer_sizes(), path.display());
    Ok(network)
}

/// Parses the text layout of [`save_text`].
pub fn parse_text(content: &str) -> Result<Network, DataError> {
    let mut tokens = content.split_whitespace();

    let nb_layers: usize = next_token(&mut tokens, "layer count")?;
    let mut sizes = Vec::new();
    for i in 0..nb_layers {
        sizes.push(next_token::<usize>(&mut tokens, &format!("size of layer {}", i))?);
    }
    if sizes.len() < 2 || sizes.contains(&0) {
        return Err(DataError::Parse(format!("invalid layer sizes {:?}", sizes)));
    }

    let mut weights = Vec::with_capacity(sizes.len() - 1);
    let mut biases = Vec::with_capacity(sizes.len() - 1);
    for (k, pair) in sizes.windows(2).enumerate() {
        let (prev, nodes) = (pair[0], pair[1]);
        let nb_weights = nodes.checked_mul(prev).ok_or_else(|| {
            DataError::Parse(format!("layer {} of {}x{} weights is too large", k, nodes, prev))
        })?;
        // Sizes come from the file; buffers grow with the values actually read.
        let mut w = Vec::new();
        for _ in 0..nb_weights {
            w.push(next_token::<f64>(&mut tokens, &format!("weight of layer {}", k))?);
        }
        let mut b = Vec::new();
        for _ in 0..nodes {
            b.push(next_token::<f64>(&mut tokens, &format!("bias of layer {}", k))?);
        }
        weights.push(Matrix::from_vec(nodes, prev, w));
        biases.push(Matrix::column(b));
    }
    if let Some(extra) = tokens.next() {
        return Err(DataError::Parse(format!("unexpected trailing value '{}'", extra)));
    }

    Ok(Network::from_parameters(&sizes, weights, biases)?)
}

fn next_token<'a, T: std::str::FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<T, DataError> {
    let token = tokens
        .next()
        .ok_or_else(|| DataError::Parse(format!("unexpected end of file, expected {}", what)))?;
    token
        .parse()
        .map_err(|_| DataError::Parse(format!("cannot read {} from '{}'", what, token)))
}

/// Serializes the network parameters to a pretty-printed JSON file.
pub fn save_json(network: &Network, path: &Path) -> Result<(), DataError> {
    let file = File::create(path).map_err(|e| DataError::io(path, e))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &ModelFile::from_network(network))?;
    info!("saved model to {}", path.display());
    Ok(())
}

/// Deserializes a network from a JSON file previously written by `save_json`.
pub fn load_json(path: &Path) -> Result<Network, DataError> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let reader = BufReader::new(file);
    let model: ModelFile = serde_json::from_reader(reader)?;
    let network = model.into_network()?;
    info!("loaded model {:?} from {}", network.layer_sizes(), path.display());
    Ok(network)
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

/// Saves as JSON for a `.json` path, in the text layout otherwise.
pub fn save(network: &Network, path: &Path) -> Result<(), DataError> {
    if is_json(path) {
        save_json(network, path)
    } else {
        save_text(network, path)
    }
}

/// Loads JSON for a `.json` path, the text layout otherwise.
pub fn load(path: &Path) -> Result<Network, DataError> {
    if is_json(path) {
        load_json(path)
    } else {
        load_text(path)
    }
}
