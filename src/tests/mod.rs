mod test_composition;
mod test_proof_id;
mod test_relations;
