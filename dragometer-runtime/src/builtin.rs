use dragometer_plugin::ProducerEntry;

const BUILTIN_PRODUCERS: &[(&str, ProducerEntry)] = &[("platoon", platoon_join::run)];

pub(crate) fn find_builtin(name: &str) -> Option<ProducerEntry> {
    BUILTIN_PRODUCERS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, entry)| *entry)
}

pub fn builtin_producer_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_PRODUCERS.iter().map(|(name, _)| *name)
}
