//! # Escrita no Formato CoNLL
//!
//! Cada caractere do texto vira uma linha `caractere \t tag_1 \t ... \t tag_n`, com uma
//! coluna por chave de rótulo. Uma linha em branco separa os registros. Não há
//! cabeçalho.
//!
//! [`OutputFile`] é o destino em disco: o arquivo só sobrevive se
//! [`OutputFile::commit`] for chamado. Qualquer saída antecipada (erro propagado com
//! `?`, pânico) apaga o arquivo parcialmente escrito no `Drop`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::bio::BioSequences;

/// Serializa registros codificados em qualquer destino `Write`.
pub struct ConllWriter<W: Write> {
    inner: W,
    records: usize,
}

impl<W: Write> ConllWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, records: 0 }
    }

    /// Escreve um registro: uma linha por caractere e a linha em branco separadora.
    pub fn write_record(&mut self, text: &str, sequences: &BioSequences) -> io::Result<()> {
        let mut line = String::new();
        for (i, ch) in text.chars().enumerate() {
            line.clear();
            line.push(ch);
            line.push('\t');
            for (col, tag) in sequences.row(i).enumerate() {
                if col > 0 {
                    line.push('\t');
                }
                line.push_str(&tag.label());
            }
            line.push('\n');
            self.inner.write_all(line.as_bytes())?;
        }
        self.inner.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    /// Quantidade de registros escritos até agora.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Arquivo de saída com limpeza garantida.
///
/// Criar o guarda cria (ou trunca) o arquivo. Sem `commit`, o `Drop` fecha e remove o
/// arquivo.
pub struct OutputFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl OutputFile {
    /// Cria ou sobrescreve `path`. O diretório pai precisa existir.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        debug!("arquivo de saída aberto: {}", path.display());
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Descarrega o buffer, fecha o arquivo e o mantém em disco.
    pub fn commit(mut self) -> io::Result<PathBuf> {
        if let Some(mut writer) = self.writer.take() {
            // Em caso de falha aqui o Drop ainda remove o arquivo.
            if let Err(e) = writer.flush() {
                self.writer = Some(writer);
                return Err(e);
            }
        }
        Ok(std::mem::take(&mut self.path))
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "arquivo de saída já fechado"))
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer()?.flush()
    }
}

impl Drop for OutputFile {
    fn drop(&mut self) {
        // Após o commit o writer já foi retirado.
        let Some(writer) = self.writer.take() else {
            return;
        };
        drop(writer);
        match fs::remove_file(&self.path) {
            Ok(()) => warn!("arquivo parcial removido: {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "não foi possível remover o arquivo parcial {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
