// SPDX-License-Identifier: Apache-2.0

// Typed view of a whole YAML document. Only used to check a source against
// the schema while the parse tree still knows line and column, merging works
// on `serde_yaml::Value`.

use std::marker::PhantomData;

use serde::{
    de::{
        self,
        value::{MapAccessDeserializer, SeqAccessDeserializer},
        DeserializeSeed, MapAccess, SeqAccess, Visitor,
    },
    Deserialize, Deserializer,
};
use serde_yaml::{Mapping, Value};

use crate::{
    deserializer::option_u32_or_string, BondSettings, BridgeSettings,
    DefinitionKind, DummySettings, EthernetSettings, GlobalOvsSettings,
    ModemSettings, NetplanDefinition, NmDeviceSettings, Renderer,
    TunnelSettings, VethSettings, VlanSettings, VrfSettings, WifiSettings,
};

pub(crate) const SUPPORTED_VERSION: u32 = 2;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
pub(crate) struct Document {
    pub(crate) network: NetworkSection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[allow(dead_code)]
pub(crate) struct NetworkSection {
    #[serde(default, deserialize_with = "version_two")]
    pub(crate) version: Option<u32>,
    pub(crate) renderer: Option<Renderer>,
    pub(crate) openvswitch: Option<GlobalOvsSettings>,
    pub(crate) ethernets: Option<Section<EthernetSettings>>,
    pub(crate) modems: Option<Section<ModemSettings>>,
    pub(crate) wifis: Option<Section<WifiSettings>>,
    pub(crate) bridges: Option<Section<BridgeSettings>>,
    pub(crate) bonds: Option<Section<BondSettings>>,
    pub(crate) tunnels: Option<Section<TunnelSettings>>,
    pub(crate) vlans: Option<Section<VlanSettings>>,
    pub(crate) vrfs: Option<Section<VrfSettings>>,
    pub(crate) dummy_devices: Option<Section<DummySettings>>,
    pub(crate) virtual_ethernets: Option<Section<VethSettings>>,
    pub(crate) nm_devices: Option<Section<NmDeviceSettings>>,
}

fn version_two<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match option_u32_or_string(deserializer)? {
        Some(v) if v != SUPPORTED_VERSION => Err(de::Error::custom(format!(
            "Only version {SUPPORTED_VERSION} is supported"
        ))),
        v => Ok(v),
    }
}

/// Per kind section: `renderer` plus definitions keyed by ID.
#[derive(Debug)]
#[allow(dead_code)]
pub(crate) struct Section<T> {
    pub(crate) renderer: Option<Renderer>,
    pub(crate) ids: Vec<String>,
    kind: PhantomData<fn() -> T>,
}

impl<'de, T> Deserialize<'de> for Section<T>
where
    T: NetplanDefinition,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SectionVisitor<T>(PhantomData<fn() -> T>);

        impl<'de, T> Visitor<'de> for SectionVisitor<T>
        where
            T: NetplanDefinition,
        {
            type Value = Section<T>;

            fn expecting(
                &self,
                formatter: &mut std::fmt::Formatter,
            ) -> std::fmt::Result {
                formatter.write_str("mapping of network definitions")
            }

            fn visit_unit<E>(self) -> Result<Section<T>, E>
            where
                E: de::Error,
            {
                Ok(Section {
                    renderer: None,
                    ids: Vec::new(),
                    kind: PhantomData,
                })
            }

            fn visit_map<A>(self, mut map: A) -> Result<Section<T>, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut renderer = None;
                let mut ids = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key == "renderer" {
                        renderer = map.next_value::<Option<Renderer>>()?;
                        continue;
                    }
                    if key.is_empty() {
                        return Err(de::Error::custom(format!(
                            "Empty ID in {} section",
                            T::KIND
                        )));
                    }
                    map.next_value_seed(StanzaSeed::<T>(PhantomData))?;
                    ids.push(key);
                }
                Ok(Section {
                    renderer,
                    ids,
                    kind: PhantomData,
                })
            }
        }

        deserializer.deserialize_any(SectionVisitor(PhantomData))
    }
}

fn check_settings<T: NetplanDefinition>(
    value: Value,
) -> Result<(), serde_yaml::Error> {
    serde_yaml::from_value::<Option<T>>(value).map(|_| ())
}

fn single_setting(key: &str, value: Value) -> Value {
    let mut map = Mapping::new();
    map.insert(Value::String(key.to_string()), value);
    Value::Mapping(map)
}

// The settings structs flatten their common parts, which hides the node
// locations from serde_yaml. A stanza is therefore checked one key at a
// time, so that errors are raised while the offending key or value is the
// current node.
struct StanzaSeed<T>(PhantomData<fn() -> T>);

impl<'de, T> DeserializeSeed<'de> for StanzaSeed<T>
where
    T: NetplanDefinition,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, T> Visitor<'de> for StanzaSeed<T>
where
    T: NetplanDefinition,
{
    type Value = ();

    fn expecting(
        &self,
        formatter: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        write!(formatter, "mapping of {} settings", T::KIND)
    }

    fn visit_unit<E>(self) -> Result<(), E>
    where
        E: de::Error,
    {
        Ok(())
    }

    fn visit_none<E>(self) -> Result<(), E>
    where
        E: de::Error,
    {
        Ok(())
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut stanza = Mapping::new();
        while let Some(key) =
            map.next_key_seed(SettingKey::<T>(PhantomData))?
        {
            let value = map.next_value_seed(SettingValue::<T> {
                key: &key,
                kind: PhantomData,
            })?;
            stanza.insert(Value::String(key), value);
        }
        check_settings::<T>(Value::Mapping(stanza)).map_err(de::Error::custom)
    }
}

/// Key of a stanza, rejected when unknown to `T`.
struct SettingKey<T>(PhantomData<fn() -> T>);

impl<'de, T> DeserializeSeed<'de> for SettingKey<T>
where
    T: NetplanDefinition,
{
    type Value = String;

    fn deserialize<D>(self, deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

impl<'de, T> Visitor<'de> for SettingKey<T>
where
    T: NetplanDefinition,
{
    type Value = String;

    fn expecting(
        &self,
        formatter: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        formatter.write_str("setting name")
    }

    fn visit_str<E>(self, v: &str) -> Result<String, E>
    where
        E: de::Error,
    {
        match check_settings::<T>(single_setting(v, Value::Null)) {
            Err(e) if e.to_string().contains("unknown field") => {
                Err(E::custom(e))
            }
            _ => Ok(v.to_string()),
        }
    }
}

/// Value of the stanza key `key`, checked on its own.
struct SettingValue<'a, T> {
    key: &'a str,
    kind: PhantomData<fn() -> T>,
}

impl<'a, T> SettingValue<'a, T>
where
    T: NetplanDefinition,
{
    fn check<E>(self, value: Value) -> Result<Value, E>
    where
        E: de::Error,
    {
        check_settings::<T>(single_setting(self.key, value.clone()))
            .map(|_| value)
            .map_err(E::custom)
    }
}

impl<'de, 'a, T> DeserializeSeed<'de> for SettingValue<'a, T>
where
    T: NetplanDefinition,
{
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, 'a, T> Visitor<'de> for SettingValue<'a, T>
where
    T: NetplanDefinition,
{
    type Value = Value;

    fn expecting(
        &self,
        formatter: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        write!(formatter, "value of '{}'", self.key)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E>
    where
        E: de::Error,
    {
        self.check(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E>
    where
        E: de::Error,
    {
        self.check(Value::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E>
    where
        E: de::Error,
    {
        self.check(Value::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E>
    where
        E: de::Error,
    {
        self.check(Value::Number(v.into()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E>
    where
        E: de::Error,
    {
        self.check(Value::String(v.to_string()))
    }

    fn visit_unit<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        self.check(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        self.check(Value::Null)
    }

    fn visit_seq<A>(self, seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let value = Value::deserialize(SeqAccessDeserializer::new(seq))?;
        self.check(value)
    }

    fn visit_map<A>(self, map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let value = Value::deserialize(MapAccessDeserializer::new(map))?;
        self.check(value)
    }
}

/// Check one definition stanza against the schema of `kind`.
pub(crate) fn check_stanza(
    kind: DefinitionKind,
    value: &serde_yaml::Value,
) -> Result<(), serde_yaml::Error> {
    fn check<T: NetplanDefinition>(
        value: &serde_yaml::Value,
    ) -> Result<(), serde_yaml::Error> {
        check_settings::<T>(value.clone())
    }
    match kind {
        DefinitionKind::Ethernet => check::<EthernetSettings>(value),
        DefinitionKind::Modem => check::<ModemSettings>(value),
        DefinitionKind::Wifi => check::<WifiSettings>(value),
        DefinitionKind::Bridge => check::<BridgeSettings>(value),
        DefinitionKind::Bond => check::<BondSettings>(value),
        DefinitionKind::Tunnel => check::<TunnelSettings>(value),
        DefinitionKind::Vlan => check::<VlanSettings>(value),
        DefinitionKind::Vrf => check::<VrfSettings>(value),
        DefinitionKind::Dummy => check::<DummySettings>(value),
        DefinitionKind::Veth => check::<VethSettings>(value),
        DefinitionKind::NmDevice => check::<NmDeviceSettings>(value),
        DefinitionKind::Port => Ok(()),
    }
}

/// Check a global key of `network` against the schema.
pub(crate) fn check_global(
    key: &str,
    value: &serde_yaml::Value,
) -> Result<(), serde_yaml::Error> {
    let value = value.clone();
    match key {
        "version" => version_two(value).map(|_| ()),
        "renderer" => {
            serde_yaml::from_value::<Option<Renderer>>(value).map(|_| ())
        }
        "openvswitch" => {
            serde_yaml::from_value::<Option<GlobalOvsSettings>>(value)
                .map(|_| ())
        }
        _ => Err(de::Error::custom(format!("unknown key '{key}'"))),
    }
}
