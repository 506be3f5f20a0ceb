//! Serialization walkthroughs.
//!
//! Each exercise builds a small graph, writes it to its own blob, reads the
//! blob back and decodes it.

use crate::catalog::{self, bank_account, employee, movie, team};
use crate::error::Result;
use crate::store::BlobStore;
use objstream_engine::{Decoded, Engine, ObjectGraph, ObjectId};

/// Runs exercises against one engine and blob store.
pub struct Lab {
    engine: Engine,
    store: BlobStore,
}

impl Lab {
    pub fn new(engine: Engine, store: BlobStore) -> Self {
        Self { engine, store }
    }

    /// Encode `root`, store it as `name`, then load and decode it.
    pub fn roundtrip(&self, name: &str, graph: &ObjectGraph, root: ObjectId) -> Result<Decoded> {
        tracing::info!("Original {}: {}", name, self.describe(graph, root));

        let bytes = self.engine.encode(graph, root)?;
        let path = self.store.write(name, &bytes)?;
        tracing::info!("{} has been serialized to {}", name, path.display());

        let loaded = self.store.read(name)?;
        let decoded = self.engine.decode(&loaded)?;
        tracing::info!(
            "Deserialized {}: {}",
            name,
            self.describe(&decoded.graph, decoded.root)
        );
        tracing::debug!(graph = %serde_json::to_string(&decoded.graph)?, "decoded graph");

        Ok(decoded)
    }

    /// A single movie.
    pub fn single_movie(&self) -> Result<Decoded> {
        let mut graph = ObjectGraph::new();
        let root = graph.insert(movie("Shrek", "Eddie Murphy", 2013, 8.5));
        self.roundtrip("movie", &graph, root)
    }

    /// A catalog holding a list of movies.
    pub fn movie_catalog(&self) -> Result<Decoded> {
        let mut graph = ObjectGraph::new();
        let movies = vec![
            graph.insert(movie("Shrek", "Eddie Murphy", 2013, 7.5)),
            graph.insert(movie("Parasite", "Bong Joon-Ho", 2019, 10.0)),
            graph.insert(movie("Us", "Jordan Peele", 2019, 8.5)),
        ];
        let root = graph.insert(catalog::catalog(movies));

        let decoded = self.roundtrip("movies", &graph, root)?;
        if let Some(list) = decoded
            .root_object()
            .and_then(|c| c.get("movies"))
            .and_then(|m| m.as_object_list())
        {
            for id in list {
                tracing::info!("  {}", self.describe(&decoded.graph, *id));
            }
        }
        Ok(decoded)
    }

    /// A bank account whose pin and last access time are transient.
    pub fn bank_account(&self) -> Result<Decoded> {
        let mut graph = ObjectGraph::new();
        let root = graph.insert(bank_account(
            "IE29-0001",
            "Mary Murphy",
            500.0,
            "9876",
            1_717_000_000.0,
        ));
        self.roundtrip("account", &graph, root)
    }

    /// A team whose members share one manager, who manages themself.
    pub fn team(&self) -> Result<Decoded> {
        let mut graph = ObjectGraph::new();
        let boss = graph.insert(employee("Carol", 90_000.0, None));
        graph.set_field(boss, "manager", boss)?;
        let members = vec![
            graph.insert(employee("Alice", 60_000.0, Some(boss))),
            graph.insert(employee("Bob", 55_000.0, Some(boss))),
            boss,
        ];
        let root = graph.insert(team("Platform", members));

        let decoded = self.roundtrip("team", &graph, root)?;
        tracing::info!(
            "Decoded team holds {} objects for {} originals",
            decoded.graph.len(),
            graph.len()
        );
        Ok(decoded)
    }

    /// Run every exercise in order.
    pub fn run_all(&self) -> Result<()> {
        self.single_movie()?;
        self.movie_catalog()?;
        self.bank_account()?;
        self.team()?;
        Ok(())
    }

    fn describe(&self, graph: &ObjectGraph, id: ObjectId) -> String {
        catalog::describe(self.engine.registry(), graph, id)
    }
}
