use std::fmt;

/// A transit agency. See <https://gtfs.org/reference/static/#agencytxt>
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Agency {
    /// Unique technical (not for the traveller) identifier for the Agency
    #[serde(rename = "agency_id")]
    pub id: String,
    ///Full name of the transit agency
    #[serde(rename = "agency_name")]
    pub name: String,
    /// URL of the transit agency
    #[serde(rename = "agency_url")]
    pub url: String,
    /// Timezone where the transit agency is located
    #[serde(rename = "agency_timezone")]
    pub timezone: String,
    /// A voice telephone number for the specified agency
    #[serde(rename = "agency_phone")]
    pub phone: String,
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Defines a specific date that is added to or removed from a service. See <https://gtfs.org/reference/static/#calendar_datestxt>
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct CalendarDate {
    /// Identifier of the service that is modified at this date
    pub service_id: String,
    /// Date where the service will be added or deleted, kept as written (YYYYMMDD)
    pub date: String,
    /// 1 when the service is added, 2 when it is removed
    pub exception_type: i32,
}

/// A commercial line. See <https://gtfs.org/reference/static/#routestxt>
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Route {
    /// Unique technical (not for the traveller) identifier for the route
    #[serde(rename = "route_id")]
    pub id: String,
    /// Agency operating the route
    pub agency_id: String,
    /// Identifier of the route in the producer's own systems
    pub external_code: String,
    /// Short name of a route. This will often be a short, abstract identifier like "32", "100X", or "Green"
    #[serde(rename = "route_short_name")]
    pub short_name: String,
    /// Full name of a route. This name is generally more descriptive than the [Route::short_name]
    #[serde(rename = "route_long_name")]
    pub long_name: String,
    /// Description of a route that provides useful, quality information
    #[serde(rename = "route_desc")]
    pub desc: String,
    /// Indicates the type of transportation used on a route, kept as written in the feed
    pub route_type: String,
    /// Route color designation that matches public facing material
    #[serde(rename = "route_color")]
    pub color: String,
    /// Legible color to use for text drawn against a background of [Route::color]
    #[serde(rename = "route_text_color")]
    pub text_color: String,
    /// URL of a web page about the particular route
    #[serde(rename = "route_url")]
    pub url: String,
}

/// A single geographical point decribing the shape of a [Trip]. See <https://gtfs.org/reference/static/#shapestxt>
///
/// All the points sharing an [Shape::id] form one polyline.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Shape {
    /// Unique technical (not for the traveller) identifier for the Shape
    #[serde(rename = "shape_id")]
    pub id: String,
    /// Sequence in which the shape points connect to form the shape. Values increase along the trip but do not need to be consecutive.
    #[serde(rename = "shape_pt_sequence")]
    pub sequence: u32,
    /// Latitude of a shape point
    #[serde(rename = "shape_pt_lat")]
    pub latitude: f64,
    /// Longitude of a shape point
    #[serde(rename = "shape_pt_lon")]
    pub longitude: f64,
    /// Actual distance traveled along the shape from the first shape point to the point specified in this record
    #[serde(rename = "shape_dist_traveled")]
    pub dist_traveled: f64,
}

/// The moment where a vehicle, running on [Trip] stops at a [Stop]. See <https://gtfs.org/reference/static/#stop_timestxt>
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct StopTime {
    /// [Trip] to which this stop time belongs to
    pub trip_id: String,
    /// Order of stops for a particular trip. The values must increase along the trip but do not need to be consecutive
    pub stop_sequence: u32,
    /// References the [Stop] served at this moment
    pub stop_id: String,
    /// Text that appears on signage identifying the trip's destination to riders
    pub stop_headsign: String,
    /// Arrival time of the stop time, kept as written (HH:MM:SS, can exceed 24:00:00)
    pub arrival_time: String,
    /// Departure time of the stop time, kept as written
    pub departure_time: String,
    /// Indicates pickup method
    pub pickup_type: i32,
    /// Indicates drop off method
    pub drop_off_type: i32,
    /// Indicates if arrival and departure times for a stop are strictly adhered to by the vehicle or if they are instead approximate and/or interpolated times
    pub timepoint: i32,
    /// Actual distance traveled along the associated shape, from the first stop to the stop specified in this record
    pub shape_dist_traveled: f64,
    /// Fare units travelled since the first stop of the trip
    pub fare_units_traveled: i32,
}

/// A physical stop, station or area. See <https://gtfs.org/reference/static/#stopstxt>
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Stop {
    /// Unique technical identifier (not for the traveller) of the stop
    #[serde(rename = "stop_id")]
    pub id: String,
    /// Short text or a number that identifies the location for riders
    #[serde(rename = "stop_code")]
    pub code: String,
    ///Name of the location. Use a name that people will understand in the local and tourist vernacular
    #[serde(rename = "stop_name")]
    pub name: String,
    /// Latitude of the stop
    #[serde(rename = "stop_lat")]
    pub latitude: f64,
    /// Longitude of the stop
    #[serde(rename = "stop_lon")]
    pub longitude: f64,
    /// Type of the location
    pub location_type: i32,
    /// Defines hierarchy between the different locations
    pub parent_station: String,
    /// Timezone of the location
    #[serde(rename = "stop_timezone")]
    pub timezone: String,
    /// Indicates whether wheelchair boardings are possible from the location
    pub wheelchair_boarding: i32,
    /// Platform identifier for a platform stop (a stop belonging to a station)
    pub platform_code: String,
    /// Identifies the fare zone for a stop
    pub zone_id: String,
}

/// Links two stops, routes or trips where a rider can change vehicle. See <https://gtfs.org/reference/static/#transferstxt>
///
/// Empty references mean the transfer is not restricted to a particular route or trip.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Transfer {
    /// Stop where a connection between routes begins
    pub from_stop_id: String,
    /// Stop where a connection between routes ends
    pub to_stop_id: String,
    /// Route where the connection begins
    pub from_route_id: String,
    /// Route where the connection ends
    pub to_route_id: String,
    /// Trip where the connection begins
    pub from_trip_id: String,
    /// Trip where the connection ends
    pub to_trip_id: String,
    /// Type of the transfer
    pub transfer_type: i32,
}

/// A Trip is a vehicle that follows a sequence of [StopTime] on certain days. See <https://gtfs.org/reference/static/#tripstxt>
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Trip {
    /// References along which [Route] this trip runs
    pub route_id: String,
    /// References the service (days of operation) of this trip
    pub service_id: String,
    /// Unique technical identifier (not for the traveller) for the Trip
    #[serde(rename = "trip_id")]
    pub id: String,
    /// Identifier used by the realtime feeds of the producer
    pub realtime_trip_id: String,
    /// Text that appears on signage identifying the trip's destination to riders
    pub trip_headsign: String,
    /// Public facing text used to identify the trip to riders
    pub trip_short_name: String,
    /// Longer public facing name of the trip
    pub trip_long_name: String,
    /// Indicates the direction of travel for a trip
    pub direction_id: i32,
    /// Identifies the block to which the trip belongs
    pub block_id: String,
    /// Shape of the trip
    pub shape_id: String,
    /// Indicates wheelchair accessibility
    pub wheelchair_accessible: i32,
    /// Indicates whether bikes are allowed
    pub bikes_allowed: i32,
}

