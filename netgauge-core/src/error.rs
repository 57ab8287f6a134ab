//! Error types for the netgauge core library.
//!
//! Each concern (edge-list loading, GML exchange, centrality iteration, and
//! analyzer orchestration) owns an error enum. Every enum exposes a stable,
//! machine-readable code so the CLI can log failures without matching on
//! display strings.

use std::{fmt, io, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while parsing an edge list.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading from the underlying stream failed.
    #[error("failed to read edge list at line {line}: {source}")]
    Io {
        /// 1-based line number being read when the failure occurred.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A line did not contain exactly two endpoint tokens.
    #[error("line {line}: expected two node identifiers, found {tokens} token(s)")]
    MalformedLine {
        /// 1-based line number of the offending line.
        line: usize,
        /// Number of whitespace-separated tokens found.
        tokens: usize,
    },
    /// A token could not be parsed as an integer node identifier.
    #[error("line {line}: `{token}` is not an integer node identifier")]
    InvalidNodeId {
        /// 1-based line number of the offending line.
        line: usize,
        /// Raw token that failed to parse.
        token: String,
    },
    /// The input held no edges at all.
    #[error("edge list contains no edges")]
    EmptyEdgeList,
}

define_error_codes! {
    /// Stable codes describing [`LoadError`] variants.
    enum LoadErrorCode for LoadError {
        /// Reading from the underlying stream failed.
        Io => Io { .. } => "LOAD_IO",
        /// A line did not contain exactly two endpoint tokens.
        MalformedLine => MalformedLine { .. } => "LOAD_MALFORMED_LINE",
        /// A token could not be parsed as an integer node identifier.
        InvalidNodeId => InvalidNodeId { .. } => "LOAD_INVALID_NODE_ID",
        /// The input held no edges at all.
        EmptyEdgeList => EmptyEdgeList => "LOAD_EMPTY_EDGE_LIST",
    }
}

/// An error produced while reading or writing GML documents.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GmlError {
    /// The underlying reader or writer failed.
    #[error("GML I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The document ended while a list or string was still open.
    #[error("unexpected end of GML document: {expected}")]
    UnexpectedEof {
        /// What the parser was waiting for.
        expected: &'static str,
    },
    /// A token appeared where the grammar does not allow it.
    #[error("unexpected GML token `{token}` at line {line}")]
    UnexpectedToken {
        /// Offending token text.
        token: String,
        /// 1-based line number of the token.
        line: usize,
    },
    /// Lists were nested deeper than the reader accepts.
    #[error("GML lists nested deeper than {depth} levels")]
    NestingTooDeep {
        /// Nesting limit that was exceeded.
        depth: usize,
    },
    /// The document has no top-level `graph [...]` block.
    #[error("GML document has no `graph` block")]
    MissingGraph,
    /// A node block lacked a usable `id`.
    #[error("GML node is missing an integer `id`")]
    MissingNodeId,
    /// A node label could not be interpreted as a node identifier.
    #[error("GML node label `{label}` is not an integer node identifier")]
    InvalidLabel {
        /// Raw label text.
        label: String,
    },
    /// Two node blocks share the same `id`.
    #[error("GML node id {id} is declared twice")]
    DuplicateNode {
        /// Repeated GML id.
        id: i64,
    },
    /// An edge referenced a node id that was never declared.
    #[error("GML edge references undeclared node id {id}")]
    UnknownEndpoint {
        /// Undeclared GML id.
        id: i64,
    },
    /// An edge block lacked `source` or `target`.
    #[error("GML edge is missing `{field}`")]
    MissingEndpoint {
        /// Name of the missing field.
        field: &'static str,
    },
}

define_error_codes! {
    /// Stable codes describing [`GmlError`] variants.
    enum GmlErrorCode for GmlError {
        /// The underlying reader or writer failed.
        Io => Io(..) => "GML_IO",
        /// The document ended while a list or string was still open.
        UnexpectedEof => UnexpectedEof { .. } => "GML_UNEXPECTED_EOF",
        /// A token appeared where the grammar does not allow it.
        UnexpectedToken => UnexpectedToken { .. } => "GML_UNEXPECTED_TOKEN",
        /// Lists were nested deeper than the reader accepts.
        NestingTooDeep => NestingTooDeep { .. } => "GML_NESTING_TOO_DEEP",
        /// The document has no top-level `graph` block.
        MissingGraph => MissingGraph => "GML_MISSING_GRAPH",
        /// A node block lacked a usable `id`.
        MissingNodeId => MissingNodeId => "GML_MISSING_NODE_ID",
        /// A node label could not be interpreted as a node identifier.
        InvalidLabel => InvalidLabel { .. } => "GML_INVALID_LABEL",
        /// Two node blocks share the same `id`.
        DuplicateNode => DuplicateNode { .. } => "GML_DUPLICATE_NODE",
        /// An edge referenced a node id that was never declared.
        UnknownEndpoint => UnknownEndpoint { .. } => "GML_UNKNOWN_ENDPOINT",
        /// An edge block lacked `source` or `target`.
        MissingEndpoint => MissingEndpoint { .. } => "GML_MISSING_ENDPOINT",
    }
}

/// An error produced by an iterative centrality computation.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CentralityError {
    /// Centrality is undefined for a graph without nodes.
    #[error("centrality is undefined for an empty graph")]
    EmptyGraph,
    /// Power iteration did not meet the tolerance within the iteration cap.
    #[error("power iteration failed to converge within {iterations} iterations")]
    NonConvergence {
        /// Iteration cap that was exhausted.
        iterations: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`CentralityError`] variants.
    enum CentralityErrorCode for CentralityError {
        /// Centrality is undefined for a graph without nodes.
        EmptyGraph => EmptyGraph => "CENTRALITY_EMPTY_GRAPH",
        /// Power iteration did not converge.
        NonConvergence => NonConvergence { .. } => "CENTRALITY_NON_CONVERGENCE",
    }
}

/// Error type produced when configuring or running [`crate::Analyzer`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NetgaugeError {
    /// Betweenness estimation needs at least one source node.
    #[error("betweenness_samples must be at least 1 (got {got})")]
    InvalidBetweennessSamples {
        /// The rejected sample count.
        got: usize,
    },
    /// Eigenvector power iteration needs at least one iteration.
    #[error("eigenvector_max_iter must be at least 1 (got {got})")]
    InvalidEigenvectorMaxIter {
        /// The rejected iteration cap.
        got: usize,
    },
    /// Eigenvector tolerance must be a positive finite number.
    #[error("eigenvector_tolerance must be finite and positive (got {got})")]
    InvalidEigenvectorTolerance {
        /// The rejected tolerance.
        got: f64,
    },
    /// The visual sample must contain at least one node.
    #[error("sample_size must be at least 1 (got {got})")]
    InvalidSampleSize {
        /// The rejected sample size.
        got: usize,
    },
    /// Metrics are undefined for a graph without nodes.
    #[error("cannot compute metrics for an empty graph")]
    EmptyGraph,
    /// An input could not be opened for reading.
    #[error("input `{source_name}` could not be opened: {error}")]
    Open {
        /// Name of the input being processed.
        source_name: Arc<str>,
        /// Underlying I/O failure.
        #[source]
        error: io::Error,
    },
    /// The edge list for a file could not be parsed.
    #[error("edge list `{source_name}` could not be loaded: {error}")]
    Load {
        /// Name of the input being processed.
        source_name: Arc<str>,
        /// Underlying loader failure.
        #[source]
        error: LoadError,
    },
    /// GML export or import failed.
    #[error(transparent)]
    Gml(#[from] GmlError),
}

define_error_codes! {
    /// Stable codes describing [`NetgaugeError`] variants.
    enum NetgaugeErrorCode for NetgaugeError {
        /// Betweenness estimation needs at least one source node.
        InvalidBetweennessSamples => InvalidBetweennessSamples { .. } => "NETGAUGE_INVALID_BETWEENNESS_SAMPLES",
        /// Eigenvector power iteration needs at least one iteration.
        InvalidEigenvectorMaxIter => InvalidEigenvectorMaxIter { .. } => "NETGAUGE_INVALID_EIGENVECTOR_MAX_ITER",
        /// Eigenvector tolerance must be a positive finite number.
        InvalidEigenvectorTolerance => InvalidEigenvectorTolerance { .. } => "NETGAUGE_INVALID_EIGENVECTOR_TOLERANCE",
        /// The visual sample must contain at least one node.
        InvalidSampleSize => InvalidSampleSize { .. } => "NETGAUGE_INVALID_SAMPLE_SIZE",
        /// Metrics are undefined for a graph without nodes.
        EmptyGraph => EmptyGraph => "NETGAUGE_EMPTY_GRAPH",
        /// An input could not be opened for reading.
        OpenFailure => Open { .. } => "NETGAUGE_OPEN_FAILURE",
        /// The edge list for a file could not be parsed.
        LoadFailure => Load { .. } => "NETGAUGE_LOAD_FAILURE",
        /// GML export or import failed.
        GmlFailure => Gml(..) => "NETGAUGE_GML_FAILURE",
    }
}

impl NetgaugeError {
    /// Retrieve the inner [`LoadErrorCode`] when the error originated in the loader.
    #[must_use]
    pub const fn load_code(&self) -> Option<LoadErrorCode> {
        match self {
            Self::Load { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, NetgaugeError>;
